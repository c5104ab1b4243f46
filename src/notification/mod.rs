//! 归档通知
//!
//! 关闭反馈轮次后，把被清理的归档备份发送给运维收件人。发送失败只记录日志。

mod log_sink;
mod webhook;

pub use log_sink::LogNotificationSink;
pub use webhook::WebhookNotificationSink;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::NotificationConfig;
use crate::errors::Result;
use crate::models::archived_feedbacks::entities::ArchiveExport;

/// 附件在通知中的固定文件名
pub const ATTACHMENT_FILENAME: &str = "Archived_Feedback.xlsx";

/// 一次归档通知
#[derive(Debug, Clone)]
pub struct ArchiveNotification {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachment: ArchiveExport,
}

impl ArchiveNotification {
    /// 按学期构造通知正文
    pub fn for_semester(
        semester: &str,
        sender: impl Into<String>,
        recipients: Vec<String>,
        mut attachment: ArchiveExport,
    ) -> Self {
        attachment.filename = ATTACHMENT_FILENAME.to_string();
        Self {
            sender: sender.into(),
            recipients,
            subject: format!("Feedback Archived for Semester {semester}"),
            body: format!(
                "The feedback round for semester {semester} has closed. Archived data is attached."
            ),
            attachment,
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// 通道名称，用于日志
    fn name(&self) -> &'static str;

    async fn send(&self, notification: ArchiveNotification) -> Result<()>;
}

/// 根据配置创建通知通道，webhook 配置不可用时回退到日志通道
pub fn create_notification_sink(config: &NotificationConfig) -> Arc<dyn NotificationSink> {
    match config.sink_type.as_str() {
        "webhook" => match WebhookNotificationSink::new(config) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                warn!("Webhook notification unavailable ({}), falling back to log", e);
                Arc::new(LogNotificationSink)
            }
        },
        "log" => Arc::new(LogNotificationSink),
        other => {
            warn!("Unknown notification type '{}', falling back to log", other);
            Arc::new(LogNotificationSink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::archived_feedbacks::entities::ExportFormat;

    fn config(sink_type: &str, url: &str) -> NotificationConfig {
        NotificationConfig {
            sink_type: sink_type.into(),
            webhook_url: url.into(),
            sender: "portal@example.edu".into(),
            recipients: vec!["ops@example.edu".into()],
            timeout: 5,
        }
    }

    #[test]
    fn test_notification_subject_and_attachment_name() {
        let export = ArchiveExport {
            filename: "whatever.xlsx".into(),
            format: ExportFormat::Xlsx,
            bytes: vec![1, 2, 3],
        };
        let n = ArchiveNotification::for_semester(
            "Winter-2025",
            "portal@example.edu",
            vec!["ops@example.edu".into()],
            export,
        );
        assert_eq!(n.subject, "Feedback Archived for Semester Winter-2025");
        assert_eq!(n.attachment.filename, ATTACHMENT_FILENAME);
        assert!(n.body.contains("Winter-2025"));
    }

    #[test]
    fn test_factory_selects_sink() {
        assert_eq!(create_notification_sink(&config("log", "")).name(), "log");
        assert_eq!(
            create_notification_sink(&config("webhook", "http://127.0.0.1:9/mail")).name(),
            "webhook"
        );
        // 未配置 URL 时回退到日志通道
        assert_eq!(create_notification_sink(&config("webhook", "")).name(), "log");
        assert_eq!(create_notification_sink(&config("smtp", "")).name(), "log");
    }
}
