use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::feedbacks::entities::FeedbackRatings;

/// 归档反馈（去规范化快照）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/archived_feedback.ts")]
#[serde(rename_all = "camelCase")]
pub struct ArchivedFeedback {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub student_name: String,
    pub student_roll_no: String,
    pub student_email: String,
    pub professor_name: String,
    pub professor_email: String,
    #[serde(flatten)]
    #[ts(flatten)]
    pub ratings: FeedbackRatings,
    #[serde(rename = "nominatedForBestTA")]
    pub nominated_for_best_ta: bool,
    pub comments: String,
    pub semester: String,
    #[serde(rename = "archivedDate")]
    pub archived_at: chrono::DateTime<chrono::Utc>,
}

/// 导出文件格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/archived_feedback.ts")]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

/// 已渲染的导出文件，保存在内存中
#[derive(Debug, Clone)]
pub struct ArchiveExport {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}
