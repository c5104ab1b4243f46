use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::archived_feedbacks::requests::{
    ArchivedDownloadQuery, ArchivedFeedbackListQuery,
};
use crate::services::ArchivedFeedbackService;

// 懒加载的全局 ARCHIVED_FEEDBACK_SERVICE 实例
static ARCHIVED_FEEDBACK_SERVICE: Lazy<ArchivedFeedbackService> =
    Lazy::new(ArchivedFeedbackService::new_lazy);

// HTTP处理程序
pub async fn list_archived_feedbacks(
    req: HttpRequest,
    query: web::Query<ArchivedFeedbackListQuery>,
) -> ActixResult<HttpResponse> {
    ARCHIVED_FEEDBACK_SERVICE
        .list_archived_feedbacks(&req, query.into_inner())
        .await
}

pub async fn download_archived_feedbacks(
    req: HttpRequest,
    query: web::Query<ArchivedDownloadQuery>,
) -> ActixResult<HttpResponse> {
    ARCHIVED_FEEDBACK_SERVICE
        .download_archived_feedbacks(&req, query.into_inner())
        .await
}

pub async fn list_semesters(req: HttpRequest) -> ActixResult<HttpResponse> {
    ARCHIVED_FEEDBACK_SERVICE.list_semesters(&req).await
}

pub async fn get_status(req: HttpRequest) -> ActixResult<HttpResponse> {
    ARCHIVED_FEEDBACK_SERVICE.get_status(&req).await
}

// 配置路由
pub fn configure_archived_feedback_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/archived-feedback")
            .service(web::resource("").route(web::get().to(list_archived_feedbacks)))
            .service(web::resource("/download").route(web::get().to(download_archived_feedbacks)))
            .service(web::resource("/semesters").route(web::get().to(list_semesters)))
            .service(web::resource("/status").route(web::get().to(get_status))),
    );
}
