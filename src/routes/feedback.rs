use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::feedbacks::requests::{
    ArchivedNominationsQuery, FeedbackListQuery, UpdateFeedbackRequest,
};
use crate::services::FeedbackService;

// 懒加载的全局 FEEDBACK_SERVICE 实例
static FEEDBACK_SERVICE: Lazy<FeedbackService> = Lazy::new(FeedbackService::new_lazy);

// HTTP处理程序
pub async fn start_feedback(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.start_feedback_round(&req).await
}

pub async fn update_feedback(
    req: HttpRequest,
    feedback_id: web::Path<i64>,
    update: web::Json<UpdateFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .update_feedback(&req, feedback_id.into_inner(), update.into_inner())
        .await
}

pub async fn list_professor_feedbacks(
    req: HttpRequest,
    professor_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .list_professor_feedbacks(&req, professor_id.into_inner())
        .await
}

pub async fn list_feedbacks(
    req: HttpRequest,
    query: web::Query<FeedbackListQuery>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .list_feedbacks(&req, query.into_inner())
        .await
}

pub async fn get_status(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.get_status(&req).await
}

pub async fn close_feedback(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.close_feedback_round(&req).await
}

pub async fn list_nominations(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.list_nominations(&req).await
}

pub async fn list_archived_nominations(
    req: HttpRequest,
    query: web::Query<ArchivedNominationsQuery>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .list_archived_nominations(&req, query.into_inner())
        .await
}

pub async fn download_feedbacks(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.download_feedbacks(&req).await
}

// 配置路由
pub fn configure_feedback_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/feedback")
            .service(web::resource("/start").route(web::get().to(start_feedback)))
            .service(web::resource("/status").route(web::get().to(get_status)))
            .service(web::resource("/close").route(web::post().to(close_feedback)))
            .service(web::resource("/all").route(web::get().to(list_feedbacks)))
            .service(web::resource("/nominations").route(web::get().to(list_nominations)))
            .service(
                web::resource("/archived-nominations")
                    .route(web::get().to(list_archived_nominations)),
            )
            .service(web::resource("/download").route(web::get().to(download_feedbacks)))
            .service(
                web::resource("/professor/{professor_id}")
                    .route(web::get().to(list_professor_feedbacks)),
            )
            // 放在最后，避免吞掉上面的固定路径
            .service(web::resource("/{feedback_id}").route(web::put().to(update_feedback))),
    );
}
