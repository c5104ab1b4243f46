use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// 初始化日志：生产环境输出 JSON，其余环境附带文件与行号
///
/// 返回的 guard 需要持有到进程退出，否则缓冲中的日志会丢失。
pub fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = EnvFilter::try_new(&config.app.log_level).unwrap_or_else(|e| {
        eprintln!(
            "Invalid log level '{}' ({e}), using 'info'",
            config.app.log_level
        );
        EnvFilter::new("info")
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_level(true);

    if config.is_production() {
        builder.json().with_ansi(false).init();
    } else {
        builder
            .with_ansi(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    }

    guard
}
