use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub argon2: Argon2Config,
    pub cors: CorsConfig,
    #[serde(default)]
    pub studio: StudioConfig,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub refresh_token_remember_me_expiry: i64,
}

/// Argon2 密码哈希参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64,
    pub redis: RedisConfig,
    pub memory: MemoryConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
    pub pool_size: u64,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: usize,
}

/// 工作室营业规则
///
/// 所有"小时"均为工作室本地时间（UTC + `utc_offset_minutes`）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub name: String,
    pub utc_offset_minutes: i32,
    pub open_hour: u32,
    pub close_hour: u32,
    pub session_minutes: i64,
    pub slot_step_minutes: i64,
    pub advance_notice_hours: i64,
    pub cancel_notice_hours: i64,
    pub max_days_ahead: i64,
    pub duo_capacity: u32,
    pub group_capacity: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            name: "Pilates Studio".to_string(),
            utc_offset_minutes: 420,
            open_hour: 7,
            close_hour: 21,
            session_minutes: 60,
            slot_step_minutes: 60,
            advance_notice_hours: 2,
            cancel_notice_hours: 24,
            max_days_ahead: 60,
            duo_capacity: 2,
            group_capacity: 6,
        }
    }
}

/// LINE Messaging API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub enabled: bool,
    pub api_base: String,
    #[serde(skip_serializing)]
    pub channel_access_token: String,
    #[serde(skip_serializing)]
    pub channel_secret: String,
    pub request_timeout: u64, // 秒
    pub max_attempts: i32,
    pub link_code_ttl: u64, // 秒
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: "https://api.line.me".to_string(),
            channel_access_token: String::new(),
            channel_secret: String::new(),
            request_timeout: 10,
            max_attempts: 3,
            link_code_ttl: 600,
        }
    }
}

/// 定时任务配置（cron 表达式包含秒字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// 是否在 API 进程内同时运行定时任务
    pub embedded: bool,
    pub dispatch_cron: String,
    pub reminder_cron: String,
    pub expiry_cron: String,
    pub dispatch_batch_size: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            embedded: false,
            dispatch_cron: "0 * * * * *".to_string(),
            reminder_cron: "0 */10 * * * *".to_string(),
            expiry_cron: "0 0 * * * *".to_string(),
            dispatch_batch_size: 100,
        }
    }
}
