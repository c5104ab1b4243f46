use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::common::response::error_response;
use crate::models::feedbacks::{
    requests::{ArchivedNominationsQuery, FeedbackListQuery},
    responses::{FeedbackStatusResponse, ProfessorFeedbackResponse},
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_professor_feedbacks(
    service: &FeedbackService,
    request: &HttpRequest,
    professor_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_professor_feedbacks(professor_id).await {
        Ok(feedbacks) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProfessorFeedbackResponse { feedbacks },
            "Feedback retrieved successfully.",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_feedbacks(
    service: &FeedbackService,
    request: &HttpRequest,
    query: FeedbackListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_feedbacks_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Feedback list retrieved successfully.",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_status(
    service: &FeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.is_feedback_round_active().await {
        Ok(active) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeedbackStatusResponse { active },
            "Feedback status retrieved.",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_nominations(
    service: &FeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_nominations().await {
        Ok(nominations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            nominations,
            "Nominations retrieved successfully.",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_archived_nominations(
    service: &FeedbackService,
    request: &HttpRequest,
    query: ArchivedNominationsQuery,
) -> ActixResult<HttpResponse> {
    let semester = match query.semester.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SemesterRequired,
                "Semester is required.",
            )));
        }
    };

    let storage = service.get_storage(request);

    match storage.list_archived_nominations(&semester).await {
        Ok(nominations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            nominations,
            format!("Archived nominations for {semester} retrieved successfully."),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
