use serde::Serialize;
use ts_rs::TS;

use super::entities::ResetSummary;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
#[serde(rename_all = "camelCase")]
pub struct SemesterResetResponse {
    pub semester: String,
    pub cleared: ResetSummary,
}
