//! 归档学期列表与总数
//!
//! 两者都走缓存，关闭轮次后失效，并以短 TTL 兜底。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ArchivedFeedbackService;
use crate::cache::{ARCHIVED_COUNT_KEY, ARCHIVED_SEMESTERS_KEY, cache_archive_view, get_json};
use crate::models::ApiResponse;
use crate::models::archived_feedbacks::responses::{
    ArchivedFeedbackStatusResponse, SemesterListResponse,
};
use crate::models::common::response::error_response;

pub async fn list_semesters(
    service: &ArchivedFeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = service.get_cache(request);

    if let Some(cache) = &cache
        && let Some(semesters) = get_json::<Vec<String>>(cache.as_ref(), ARCHIVED_SEMESTERS_KEY).await
    {
        return Ok(semesters_response(semesters));
    }

    let storage = service.get_storage(request);
    let semesters = match storage.list_archived_semesters().await {
        Ok(semesters) => semesters,
        Err(e) => return Ok(error_response(&e)),
    };

    if let Some(cache) = &cache {
        cache_archive_view(cache.as_ref(), ARCHIVED_SEMESTERS_KEY, &semesters).await;
    }

    Ok(semesters_response(semesters))
}

pub async fn get_status(
    service: &ArchivedFeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = service.get_cache(request);

    if let Some(cache) = &cache
        && let Some(total) = get_json::<i64>(cache.as_ref(), ARCHIVED_COUNT_KEY).await
    {
        return Ok(status_response(total));
    }

    let storage = service.get_storage(request);
    let total = match storage.count_archived_feedbacks().await {
        Ok(total) => total,
        Err(e) => return Ok(error_response(&e)),
    };

    if let Some(cache) = &cache {
        cache_archive_view(cache.as_ref(), ARCHIVED_COUNT_KEY, &total).await;
    }

    Ok(status_response(total))
}

fn semesters_response(semesters: Vec<String>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(
        SemesterListResponse { semesters },
        "Archived semesters retrieved successfully.",
    ))
}

fn status_response(total_archived_feedback: i64) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(
        ArchivedFeedbackStatusResponse {
            total_archived_feedback,
        },
        "Archived feedback status retrieved.",
    ))
}
