pub mod download;
pub mod list;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::archived_feedbacks::requests::{
    ArchivedDownloadQuery, ArchivedFeedbackListQuery,
};
use crate::storage::Storage;

pub struct ArchivedFeedbackService {
    storage: Option<Arc<dyn Storage>>,
}

impl ArchivedFeedbackService {
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

    // 分页列出归档反馈
    pub async fn list_archived_feedbacks(
        &self,
        request: &HttpRequest,
        query: ArchivedFeedbackListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_archived_feedbacks(self, request, query).await
    }

    // 导出归档反馈
    pub async fn download_archived_feedbacks(
        &self,
        request: &HttpRequest,
        query: ArchivedDownloadQuery,
    ) -> ActixResult<HttpResponse> {
        download::download_archived_feedbacks(self, request, query).await
    }

    pub async fn list_semesters(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        status::list_semesters(self, request).await
    }

    pub async fn get_status(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        status::get_status(self, request).await
    }
}
