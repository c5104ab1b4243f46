use async_trait::async_trait;
use tracing::info;

use super::{ArchiveNotification, NotificationSink};
use crate::errors::Result;

/// 只记录日志的通知通道
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, notification: ArchiveNotification) -> Result<()> {
        info!(
            "Archive notification '{}' to {:?} with attachment {} ({} bytes)",
            notification.subject,
            notification.recipients,
            notification.attachment.filename,
            notification.attachment.bytes.len()
        );
        Ok(())
    }
}
