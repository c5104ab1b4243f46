use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::SemesterService;
use crate::errors::PortalError;
use crate::models::common::response::{error_response, error_response_with_code};
use crate::models::semesters::{requests::NewSemesterRequest, responses::SemesterResetResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::{current_semester_label, validate::validate_semester_label};

pub async fn new_semester(
    service: &SemesterService,
    request: &HttpRequest,
    body: NewSemesterRequest,
) -> ActixResult<HttpResponse> {
    let semester = match body.current_semester.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => {
            if let Err(msg) = validate_semester_label(label) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::SemesterInvalid, msg)));
            }
            label.to_string()
        }
        _ => current_semester_label(),
    };

    let storage = service.get_storage(request);

    match storage.reset_semester().await {
        Ok(cleared) => {
            info!("New semester {} started, cleared {:?}", semester, cleared);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SemesterResetResponse {
                    semester: semester.clone(),
                    cleared,
                },
                format!("Database reset for new semester {semester}."),
            )))
        }
        Err(e @ PortalError::Conflict(_)) => {
            warn!("Semester reset for {} blocked: {}", semester, e.message());
            Ok(error_response_with_code(&e, ErrorCode::SemesterResetBlocked))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
