pub mod archived_feedback;

pub mod feedback;

pub mod semester;

pub use archived_feedback::configure_archived_feedback_routes;
pub use feedback::configure_feedback_routes;
pub use semester::configure_semester_routes;

use actix_web::web;

// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_feedback_routes)
        .configure(configure_archived_feedback_routes)
        .configure(configure_semester_routes);
}
