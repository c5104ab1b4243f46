use serde::Deserialize;
use ts_rs::TS;

// 新学期重置请求，请求体可省略
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
#[serde(rename_all = "camelCase")]
pub struct NewSemesterRequest {
    pub current_semester: Option<String>,
}
