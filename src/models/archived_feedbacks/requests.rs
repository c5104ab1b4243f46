use serde::Deserialize;
use ts_rs::TS;

use super::entities::ExportFormat;
use crate::models::common::PaginationQuery;

// 归档反馈列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/archived_feedback.ts")]
pub struct ArchivedFeedbackListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub semester: Option<String>,
}

// 归档导出查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/archived_feedback.ts")]
pub struct ArchivedDownloadQuery {
    pub semester: Option<String>,
    #[serde(default)]
    pub format: ExportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_query_defaults_to_xlsx() {
        let query: ArchivedDownloadQuery =
            serde_json::from_str(r#"{"semester":"Winter-2025"}"#).expect("valid query");
        assert_eq!(query.format, ExportFormat::Xlsx);

        let query: ArchivedDownloadQuery =
            serde_json::from_str(r#"{"format":"csv"}"#).expect("valid query");
        assert_eq!(query.format, ExportFormat::Csv);
        assert!(query.semester.is_none());
    }
}
