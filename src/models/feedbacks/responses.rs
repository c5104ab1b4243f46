use serde::Serialize;
use ts_rs::TS;

use super::entities::{CourseRef, Feedback, FeedbackRatings, StudentRef};
use crate::models::common::PaginationInfo;

// 在线反馈分页响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct FeedbackListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Feedback>,
}

// 教授视角下的单条助教反馈
//
// 尚未生成占位记录时 `id` 为 null，评价字段取默认值。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
#[serde(rename_all = "camelCase")]
pub struct ProfessorFeedbackItem {
    pub id: Option<i64>,
    pub course: CourseRef,
    pub student: StudentRef,
    pub professor_name: String,
    #[serde(flatten)]
    #[ts(flatten)]
    pub ratings: FeedbackRatings,
    #[serde(rename = "nominatedForBestTA")]
    pub nominated_for_best_ta: bool,
    pub comments: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct ProfessorFeedbackResponse {
    pub feedbacks: Vec<ProfessorFeedbackItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct FeedbackStatusResponse {
    pub active: bool,
}

// 开启反馈轮次的结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct FeedbackRoundStarted {
    pub created: i64,
}
