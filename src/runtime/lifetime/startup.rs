use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::line::LineClient;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_password;
use std::sync::Arc;
use tokio_cron_scheduler::JobScheduler;
use tracing::{debug, info, warn};

type StartupResult<T> = Result<T, Box<dyn std::error::Error>>;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub line_client: Arc<LineClient>,
    /// 仅在 `worker.embedded` 开启时存在
    pub scheduler: Option<JobScheduler>,
}

/// 按名称构造缓存后端
async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> StartupResult<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则创建一个默认的 admin 账号
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("Studio Admin".to_string()),
        phone: None,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 存储与 LINE 客户端，API 与 worker 进程共用
pub async fn prepare_core() -> StartupResult<(Arc<dyn Storage>, Arc<LineClient>)> {
    // 已安装时返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::get();
    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let line_client = Arc::new(LineClient::new(&config.line)?);
    if line_client.is_enabled() {
        info!("LINE messaging enabled ({})", config.line.api_base);
    } else {
        warn!("LINE messaging disabled, pushes will be marked as skipped");
    }

    Ok((storage, line_client))
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、LINE 客户端和可选的内嵌定时任务
pub async fn prepare_server_startup() -> StartupResult<StartupContext> {
    let config = AppConfig::get();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let (storage, line_client) = prepare_core().await?;

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    let scheduler = if config.worker.embedded {
        let scheduler =
            crate::worker::start_scheduler(storage.clone(), line_client.clone(), config).await?;
        warn!("Embedded worker started inside the API process");
        Some(scheduler)
    } else {
        None
    };

    Ok(StartupContext {
        storage,
        cache,
        line_client,
        scheduler,
    })
}
