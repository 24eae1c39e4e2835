//! 定时任务
//!
//! - 每分钟：发送到期的 LINE 推送
//! - 每 10 分钟：为即将开始的已确认预约生成提醒
//! - 每小时：将过期课程包标记为 expired
//!
//! 各任务互不协调，错误只记录日志。

pub mod dispatch;
pub mod expiry;
pub mod reminders;

use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::line::LineClient;
use crate::services::Notifier;
use crate::storage::Storage;

/// 注册并启动全部定时任务
///
/// 返回的调度器需要由调用方持有，关闭时调用 `shutdown`。
pub async fn start_scheduler(
    storage: Arc<dyn Storage>,
    line_client: Arc<LineClient>,
    config: &AppConfig,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    let notifier = Notifier::new(storage.clone(), &config.studio);

    let job_storage = storage.clone();
    let batch_size = config.worker.dispatch_batch_size;
    let max_attempts = config.line.max_attempts;
    let dispatch_job = Job::new_async(config.worker.dispatch_cron.as_str(), move |_uuid, _lock| {
        let storage = job_storage.clone();
        let client = line_client.clone();
        Box::pin(async move {
            if let Err(e) =
                dispatch::dispatch_notifications(&storage, &client, batch_size, max_attempts).await
            {
                error!("Error dispatching notifications: {}", e);
            }
        })
    })?;

    let job_storage = storage.clone();
    let job_notifier = notifier.clone();
    let reminder_job = Job::new_async(config.worker.reminder_cron.as_str(), move |_uuid, _lock| {
        let storage = job_storage.clone();
        let notifier = job_notifier.clone();
        Box::pin(async move {
            if let Err(e) = reminders::create_reminders(&storage, &notifier).await {
                error!("Error creating booking reminders: {}", e);
            }
        })
    })?;

    let job_storage = storage.clone();
    let job_notifier = notifier;
    let expiry_job = Job::new_async(config.worker.expiry_cron.as_str(), move |_uuid, _lock| {
        let storage = job_storage.clone();
        let notifier = job_notifier.clone();
        Box::pin(async move {
            if let Err(e) = expiry::expire_packages(&storage, &notifier).await {
                error!("Error expiring packages: {}", e);
            }
        })
    })?;

    scheduler.add(dispatch_job).await?;
    scheduler.add(reminder_job).await?;
    scheduler.add(expiry_job).await?;
    scheduler.start().await?;

    info!(
        "Worker scheduler started (dispatch: {}, reminders: {}, expiry: {})",
        config.worker.dispatch_cron, config.worker.reminder_cron, config.worker.expiry_cron
    );

    Ok(scheduler)
}
