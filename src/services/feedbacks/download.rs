//! 在线反馈导出

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::FeedbackService;
use crate::models::common::response::{error_response, error_response_with_code};
use crate::models::ErrorCode;
use crate::services::attachment_response;
use crate::utils::export::render_live;

pub async fn download_feedbacks(
    service: &FeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let feedbacks = match storage.list_all_feedbacks().await {
        Ok(feedbacks) => feedbacks,
        Err(e) => return Ok(error_response(&e)),
    };

    match render_live(&feedbacks) {
        Ok(export) => Ok(attachment_response(export)),
        Err(e) => {
            error!("Failed to render live feedback export: {}", e);
            Ok(error_response_with_code(&e, ErrorCode::ArchiveExportFailed))
        }
    }
}
