use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String, // development / production
    pub log_level: String,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub unix_socket_path: String,
    pub workers: usize, // 0 表示按 CPU 数自动推断
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,    // 毫秒
    pub client_disconnect: u64, // 毫秒
    pub keep_alive: u64,        // 秒
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // sqlite:// / postgres:// / mysql://
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置，后端不可用时回退到 moka
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64,
    pub redis: RedisConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub max_age: usize,
}

/// 归档通知配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(rename = "type")]
    pub sink_type: String, // "webhook" 或 "log"
    #[serde(default)]
    pub webhook_url: String,
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub timeout: u64, // 请求超时 (秒)
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            sink_type: "log".to_string(),
            webhook_url: String::new(),
            sender: "ta-portal@localhost".to_string(),
            recipients: Vec::new(),
            timeout: 10,
        }
    }
}

/// 归档保留策略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    pub archived_semesters: usize, // 保留最近的学期数（不含本次关闭的学期）
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            archived_semesters: 2,
        }
    }
}
