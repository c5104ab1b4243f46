use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 支持的数据库 URL scheme
const DATABASE_SCHEMES: [&str; 4] = ["sqlite:", "postgres:", "postgresql:", "mysql:"];

/// 环境变量到配置键的显式映射
const ENV_OVERRIDES: [(&str, &str); 9] = [
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("NOTIFY_WEBHOOK_URL", "notification.webhook_url"),
];

impl AppConfig {
    /// 加载配置：config.toml → config.<APP_ENV>.toml → TAPORTAL_* → 显式环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{env}")).required(false))
            .add_source(
                Environment::with_prefix("TAPORTAL")
                    .separator("_")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        // 0 表示自动推断，受 max_workers 限制
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers).max(1);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// 启动前检查无法在运行时回退的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !DATABASE_SCHEMES
            .iter()
            .any(|scheme| self.database.url.starts_with(scheme))
        {
            return Err(ConfigError::Message(format!(
                "Unsupported database url '{}'",
                self.database.url
            )));
        }
        if let Some(bad) = self
            .notification
            .recipients
            .iter()
            .find(|r| !r.contains('@'))
        {
            return Err(ConfigError::Message(format!(
                "Invalid notification recipient '{bad}'"
            )));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const SHIPPED: &str = include_str!("../../config.toml");

    fn parse(extra: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_builder(
            Config::builder()
                .add_source(File::from_str(SHIPPED, FileFormat::Toml))
                .add_source(File::from_str(extra, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_shipped_config_parses() {
        let app_config = parse("").expect("config.toml deserializes");

        assert_eq!(app_config.retention.archived_semesters, 2);
        assert_eq!(app_config.notification.sink_type, "log");
        assert_eq!(app_config.cache.cache_type, "moka");
        assert!(app_config.server.workers >= 1);
        assert!(!app_config.is_production());
    }

    #[test]
    fn test_rejects_unknown_database_scheme() {
        let err = parse("[database]\nurl = \"mongodb://localhost\"\npool_size = 1\ntimeout = 1")
            .unwrap_err();
        assert!(err.to_string().contains("mongodb://localhost"));
    }

    #[test]
    fn test_rejects_malformed_recipient() {
        let err = parse("[notification]\ntype = \"log\"\nsender = \"a@b\"\nrecipients = [\"ops\"]\ntimeout = 5")
            .unwrap_err();
        assert!(err.to_string().contains("ops"));
    }

    #[test]
    fn test_optional_sections_default() {
        let mut trimmed = String::new();
        let mut skipping = false;
        for line in SHIPPED.lines() {
            if line.starts_with('[') {
                skipping = line == "[notification]" || line == "[retention]";
            }
            if !skipping {
                trimmed.push_str(line);
                trimmed.push('\n');
            }
        }
        let app_config = AppConfig::from_builder(
            Config::builder().add_source(File::from_str(&trimmed, FileFormat::Toml)),
        )
        .expect("config without optional sections");
        assert_eq!(app_config.retention.archived_semesters, 2);
        assert_eq!(app_config.notification.sink_type, "log");
    }
}
