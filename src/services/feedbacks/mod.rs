pub mod close;
pub mod download;
pub mod list;
pub mod start;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::models::feedbacks::requests::{
    ArchivedNominationsQuery, FeedbackListQuery, UpdateFeedbackRequest,
};
use crate::notification::{LogNotificationSink, NotificationSink};
use crate::storage::Storage;

/// 关闭轮次时使用的归档策略
#[derive(Debug, Clone)]
pub struct ArchivePolicy {
    /// 除本次学期外保留的最近学期数
    pub keep_recent: usize,
    pub sender: String,
    pub recipients: Vec<String>,
}

impl ArchivePolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            keep_recent: config.retention.archived_semesters,
            sender: config.notification.sender.clone(),
            recipients: config.notification.recipients.clone(),
        }
    }
}

pub struct FeedbackService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeedbackService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        super::cache_from_request(request)
    }

    // 未注册通知通道时只写日志
    pub(crate) fn get_notifier(&self, request: &HttpRequest) -> Arc<dyn NotificationSink> {
        request
            .app_data::<web::Data<Arc<dyn NotificationSink>>>()
            .map(|sink| sink.get_ref().clone())
            .unwrap_or_else(|| Arc::new(LogNotificationSink))
    }

    pub(crate) fn get_policy(&self, request: &HttpRequest) -> ArchivePolicy {
        request
            .app_data::<web::Data<ArchivePolicy>>()
            .map(|policy| policy.get_ref().clone())
            .unwrap_or_else(|| ArchivePolicy::from_config(AppConfig::get()))
    }

    // 开启反馈轮次
    pub async fn start_feedback_round(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        start::start_feedback_round(self, request).await
    }

    // 更新单条反馈
    pub async fn update_feedback(
        &self,
        request: &HttpRequest,
        feedback_id: i64,
        update: UpdateFeedbackRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_feedback(self, request, feedback_id, update).await
    }

    pub async fn list_professor_feedbacks(
        &self,
        request: &HttpRequest,
        professor_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_professor_feedbacks(self, request, professor_id).await
    }

    pub async fn list_feedbacks(
        &self,
        request: &HttpRequest,
        query: FeedbackListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_feedbacks(self, request, query).await
    }

    pub async fn get_status(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_status(self, request).await
    }

    // 关闭轮次并归档
    pub async fn close_feedback_round(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        close::close_feedback_round(self, request).await
    }

    pub async fn list_nominations(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_nominations(self, request).await
    }

    pub async fn list_archived_nominations(
        &self,
        request: &HttpRequest,
        query: ArchivedNominationsQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_archived_nominations(self, request, query).await
    }

    // 导出在线反馈表格
    pub async fn download_feedbacks(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        download::download_feedbacks(self, request).await
    }
}
