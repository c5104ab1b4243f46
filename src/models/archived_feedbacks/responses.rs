use serde::Serialize;
use ts_rs::TS;

use super::entities::ArchivedFeedback;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/archived_feedback.ts")]
pub struct ArchivedFeedbackListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<ArchivedFeedback>,
}

// 已归档学期列表，最近的在前
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/archived_feedback.ts")]
pub struct SemesterListResponse {
    pub semesters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/archived_feedback.ts")]
#[serde(rename_all = "camelCase")]
pub struct ArchivedFeedbackStatusResponse {
    pub total_archived_feedback: i64,
}
