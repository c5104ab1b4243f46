use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::errors::PortalError;
use crate::models::common::response::{error_response, error_response_with_code};
use crate::models::feedbacks::requests::UpdateFeedbackRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_feedback(
    service: &FeedbackService,
    request: &HttpRequest,
    feedback_id: i64,
    update: UpdateFeedbackRequest,
) -> ActixResult<HttpResponse> {
    if update.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "No feedback fields to update.",
        )));
    }

    let storage = service.get_storage(request);

    match storage.update_feedback(feedback_id, update).await {
        Ok(feedback) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            feedback,
            "Feedback updated successfully.",
        ))),
        Err(e @ PortalError::NotFound(_)) => {
            Ok(error_response_with_code(&e, ErrorCode::FeedbackNotFound))
        }
        Err(e @ PortalError::Validation(_)) => {
            Ok(error_response_with_code(&e, ErrorCode::FeedbackRatingInvalid))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
