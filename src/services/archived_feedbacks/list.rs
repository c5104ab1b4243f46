use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ArchivedFeedbackService;
use crate::models::ApiResponse;
use crate::models::archived_feedbacks::requests::ArchivedFeedbackListQuery;
use crate::models::common::response::error_response;

pub async fn list_archived_feedbacks(
    service: &ArchivedFeedbackService,
    request: &HttpRequest,
    query: ArchivedFeedbackListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_archived_feedbacks_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Archived feedback retrieved successfully.",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
