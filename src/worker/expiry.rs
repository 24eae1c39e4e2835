use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::errors::Result;
use crate::services::Notifier;
use crate::storage::Storage;

/// 过期课程包改为 expired 并通知顾客
pub async fn expire_packages(storage: &Arc<dyn Storage>, notifier: &Notifier) -> Result<usize> {
    let expired = storage.expire_packages(Utc::now()).await?;
    for package in &expired {
        notifier.package_expired(package).await;
    }
    if !expired.is_empty() {
        info!("Expired {} package(s)", expired.len());
    }
    Ok(expired.len())
}
