use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use super::{ArchiveNotification, NotificationSink};
use crate::config::NotificationConfig;
use crate::errors::{PortalError, Result};

/// 通过邮件中继的 HTTP 接口发送通知（multipart 表单）
pub struct WebhookNotificationSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotificationSink {
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        if config.webhook_url.trim().is_empty() {
            return Err(PortalError::notification("notification.webhook_url is empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| PortalError::notification(format!("HTTP 客户端创建失败: {e}")))?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
        })
    }

    fn build_form(notification: ArchiveNotification) -> Result<Form> {
        let attachment = notification.attachment;
        let part = Part::bytes(attachment.bytes)
            .file_name(attachment.filename)
            .mime_str(attachment.format.content_type())
            .map_err(|e| PortalError::notification(format!("附件类型无效: {e}")))?;

        let mut form = Form::new()
            .text("from", notification.sender)
            .text("subject", notification.subject)
            .text("text", notification.body);
        for recipient in notification.recipients {
            form = form.text("to", recipient);
        }

        Ok(form.part("attachment", part))
    }
}

#[async_trait]
impl NotificationSink for WebhookNotificationSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, notification: ArchiveNotification) -> Result<()> {
        let subject = notification.subject.clone();
        let form = Self::build_form(notification)?;

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Notification request failed: {}", e);
                PortalError::notification(format!("通知发送失败: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortalError::notification(format!(
                "通知接口返回 {status}: {body}"
            )));
        }

        debug!("Notification '{}' delivered via webhook", subject);
        Ok(())
    }
}
