use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeedbackService;
use crate::models::common::response::error_response;
use crate::models::{ApiResponse, feedbacks::responses::FeedbackRoundStarted};

pub async fn start_feedback_round(
    service: &FeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.start_feedback_round().await {
        Ok(created) => {
            info!("Feedback round opened with {} placeholder records", created);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                FeedbackRoundStarted { created },
                "Feedback round started.",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
