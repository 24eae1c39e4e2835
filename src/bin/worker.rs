//! 独立运行的定时任务进程
//!
//! 与 API 进程共用配置和数据库；`worker.embedded = true` 时不需要单独启动。

use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{error, warn};

use pilates_studio::config::AppConfig;
use pilates_studio::runtime::{lifetime, logging};
use pilates_studio::worker;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();

    AppConfig::init().map_err(std::io::Error::other)?;
    let config = AppConfig::get();
    let _guard = logging::init_tracing(config);

    warn!(
        "Starting {} worker v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    if config.worker.embedded {
        warn!("worker.embedded is enabled, jobs may also run inside the API process");
    }

    let (storage, line_client) = lifetime::startup::prepare_core()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let mut scheduler = worker::start_scheduler(storage, line_client, config)
        .await
        .map_err(std::io::Error::other)?;

    lifetime::shutdown::listen_for_shutdown().await;

    if let Err(e) = scheduler.shutdown().await {
        error!("Failed to stop scheduler: {}", e);
    }
    warn!("Worker stopped");
    Ok(())
}
