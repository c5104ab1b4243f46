use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SemesterService;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;

pub async fn sync_database(
    service: &SemesterService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.sync_allocations().await {
        Ok(report) => {
            info!(
                "Allocation sync: removed {} TA entries, added {}, reset {} students",
                report.removed_tas, report.added_tas, report.reset_students
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                report,
                "Database synchronized successfully.",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
