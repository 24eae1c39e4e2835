use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::line::LineClient;
use crate::line::client::retry_key;
use crate::models::notifications::entities::{DeliveryOutcome, Notification};
use crate::storage::Storage;

/// 发送一批到期的 LINE 推送，返回成功发送的条数
pub async fn dispatch_notifications(
    storage: &Arc<dyn Storage>,
    client: &LineClient,
    batch_size: u64,
    max_attempts: i32,
) -> Result<usize> {
    let due = storage
        .list_due_notifications(Utc::now(), batch_size.max(1))
        .await?;
    if due.is_empty() {
        return Ok(0);
    }
    debug!("Dispatching {} due notification(s)", due.len());

    let mut sent = 0;
    for notification in due {
        let outcome = deliver(storage, client, &notification).await;
        if outcome == DeliveryOutcome::Sent {
            sent += 1;
        }
        // 单条记录失败不影响后续
        if let Err(e) = record(storage, &notification, &outcome, max_attempts).await {
            warn!(
                "Failed to record attempt for notification #{}: {}",
                notification.id, e
            );
        }
    }

    info!("Notification dispatch finished, {} sent", sent);
    Ok(sent)
}

async fn deliver(
    storage: &Arc<dyn Storage>,
    client: &LineClient,
    notification: &Notification,
) -> DeliveryOutcome {
    let line_user_id = match storage.get_user_by_id(notification.user_id).await {
        Ok(Some(user)) => user.line_user_id,
        Ok(None) => return DeliveryOutcome::Skipped("Recipient no longer exists".to_string()),
        Err(e) => return DeliveryOutcome::Failed(format!("Failed to load recipient: {e}")),
    };
    let Some(to) = line_user_id else {
        return DeliveryOutcome::Skipped("Recipient has no linked LINE account".to_string());
    };

    client
        .push_text(
            &to,
            &notification.content,
            retry_key(notification.id, notification.created_at.timestamp()),
        )
        .await
}

async fn record(
    storage: &Arc<dyn Storage>,
    notification: &Notification,
    outcome: &DeliveryOutcome,
    max_attempts: i32,
) -> Result<bool> {
    let (status, attempts) = notification.after_attempt(outcome, max_attempts);
    let (last_error, sent_at) = match outcome {
        DeliveryOutcome::Sent => (None, Some(Utc::now())),
        DeliveryOutcome::Skipped(reason) | DeliveryOutcome::Failed(reason) => {
            (Some(reason.clone()), None)
        }
    };
    storage
        .record_notification_attempt(notification.id, status, attempts, last_error, sent_at)
        .await
}
