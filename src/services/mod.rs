pub mod archived_feedbacks;
pub mod feedbacks;
pub mod semesters;

pub use archived_feedbacks::ArchivedFeedbackService;
pub use feedbacks::{ArchivePolicy, FeedbackService};
pub use semesters::SemesterService;

use std::sync::Arc;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, web};

use crate::cache::ObjectCache;
use crate::models::archived_feedbacks::entities::ArchiveExport;

/// 从 app_data 中读取可选的缓存实例
pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|cache| cache.get_ref().clone())
}

/// 以附件形式返回导出文件
pub(crate) fn attachment_response(export: ArchiveExport) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(export.format.content_type())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.filename)],
        })
        .body(export.bytes)
}
