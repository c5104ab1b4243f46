pub mod export;
pub mod parameter_error_handler;
pub mod retention;
pub mod semester;
pub mod validate;

pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};
pub use retention::{RetentionPlan, plan_retention, semesters_to_keep};
pub use semester::{current_semester_label, semester_label};
