pub mod reset;
pub mod sync;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::semesters::requests::NewSemesterRequest;
use crate::storage::Storage;

pub struct SemesterService {
    storage: Option<Arc<dyn Storage>>,
}

impl SemesterService {
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

    // 新学期重置
    pub async fn new_semester(
        &self,
        request: &HttpRequest,
        body: NewSemesterRequest,
    ) -> ActixResult<HttpResponse> {
        reset::new_semester(self, request, body).await
    }

    // 同步助教分配
    pub async fn sync_database(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        sync::sync_database(self, request).await
    }
}
