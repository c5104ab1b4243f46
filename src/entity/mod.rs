//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod admin_flags;
pub mod archived_feedbacks;
pub mod course_professors;
pub mod course_tas;
pub mod courses;
pub mod feedback_round_status;
pub mod feedbacks;
pub mod log_entries;
pub mod professors;
pub mod rounds;
pub mod students;
