//! 归档反馈导出

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ArchivedFeedbackService;
use crate::models::{ApiResponse, ErrorCode};
use crate::models::archived_feedbacks::requests::ArchivedDownloadQuery;
use crate::models::common::response::{error_response, error_response_with_code};
use crate::services::attachment_response;
use crate::utils::export::render_archive;
use crate::utils::validate::validate_semester_label;

/// 未指定学期时的导出文件名
const DEFAULT_FILE_STEM: &str = "Archived_Feedback";

pub async fn download_archived_feedbacks(
    service: &ArchivedFeedbackService,
    request: &HttpRequest,
    query: ArchivedDownloadQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let semester = query
        .semester
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    // 学期会进入导出文件名，先校验格式
    if let Some(label) = semester
        && let Err(msg) = validate_semester_label(label)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SemesterInvalid, msg)));
    }

    let feedbacks = match storage.list_archived_feedbacks(semester).await {
        Ok(feedbacks) => feedbacks,
        Err(e) => return Ok(error_response(&e)),
    };

    let file_stem = match semester {
        Some(label) => format!("{DEFAULT_FILE_STEM}_{label}"),
        None => DEFAULT_FILE_STEM.to_string(),
    };

    match render_archive(&feedbacks, query.format, &file_stem) {
        Ok(export) => {
            info!(
                "Exported {} archived feedback rows as {}",
                feedbacks.len(),
                export.filename
            );
            Ok(attachment_response(export))
        }
        Err(e) => {
            error!("Failed to render archive export: {}", e);
            Ok(error_response_with_code(&e, ErrorCode::ArchiveExportFailed))
        }
    }
}
