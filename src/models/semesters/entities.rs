use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 关闭反馈轮次的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
#[serde(rename_all = "camelCase")]
pub struct CloseOutcome {
    pub semester: String,
    pub archived: i64,
    pub pruned: i64,
    pub kept_semesters: Vec<String>,
}

/// 新学期重置时清除的记录数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub students: i64,
    pub courses: i64,
    pub rounds: i64,
    pub log_entries: i64,
    pub feedbacks: i64,
}

/// 分配一致性同步结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
#[serde(rename_all = "camelCase")]
pub struct AllocationSyncReport {
    pub removed_tas: i64,
    pub added_tas: i64,
    pub reset_students: i64,
}

/// 存储层完成关闭事务后的结果，附带被清理的归档记录用于生成备份
#[derive(Debug, Clone)]
pub struct ClosedRound {
    pub outcome: CloseOutcome,
    pub pruned_rows: Vec<crate::models::archived_feedbacks::entities::ArchivedFeedback>,
}
