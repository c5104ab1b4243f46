use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::semesters::requests::NewSemesterRequest;
use crate::services::SemesterService;

// 懒加载的全局 SEMESTER_SERVICE 实例
static SEMESTER_SERVICE: Lazy<SemesterService> = Lazy::new(SemesterService::new_lazy);

// HTTP处理程序
pub async fn new_semester(
    req: HttpRequest,
    body: Option<web::Json<NewSemesterRequest>>,
) -> ActixResult<HttpResponse> {
    // 请求体可省略
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    SEMESTER_SERVICE.new_semester(&req, body).await
}

pub async fn sync_database(req: HttpRequest) -> ActixResult<HttpResponse> {
    SEMESTER_SERVICE.sync_database(&req).await
}

// 配置路由
pub fn configure_semester_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/new/semester").route(web::delete().to(new_semester)))
        .service(web::resource("/api/admin/syncDatabase").route(web::post().to(sync_database)));
}
