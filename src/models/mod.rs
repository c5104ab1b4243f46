//! 数据模型定义
//!
//! 每个业务域分为 entities（业务实体）、requests（请求参数）、responses（响应体）三部分。

pub mod archived_feedbacks;
pub mod common;
pub mod feedbacks;
pub mod semesters;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 5000,

    // 在线反馈
    FeedbackNotFound = 2001,
    FeedbackFormClosed = 2002,
    FeedbackRoundNotActive = 2003,
    FeedbackRatingInvalid = 2004,

    // 学期与归档
    SemesterRequired = 3001,
    SemesterInvalid = 3002,
    SemesterResetBlocked = 3003,
    ArchiveExportFailed = 3004,
}
