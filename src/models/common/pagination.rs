use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// 单页最大条数
pub const MAX_PAGE_LIMIT: i64 = 100;

// 分页查询参数 `?page=&limit=`
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "lenient_i64")]
    pub page: i64,
    #[serde(default = "default_limit", deserialize_with = "lenient_i64")]
    pub limit: i64,
}

impl PaginationQuery {
    /// 规范化后的 (page, limit)，page 从 1 开始
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.max(1) as u64;
        let limit = self.limit.clamp(1, MAX_PAGE_LIMIT) as u64;
        (page, limit)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// flatten 进查询结构体后数字会以字符串形式到达
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(i64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got '{text}'"))),
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_values_are_parsed() {
        let query: PaginationQuery =
            serde_json::from_str(r#"{"page":"3","limit":50}"#).expect("valid query");
        assert_eq!(query.normalized(), (3, 50));
    }

    #[test]
    fn test_non_numeric_page_is_rejected() {
        let err = serde_json::from_str::<PaginationQuery>(r#"{"page":"first"}"#).unwrap_err();
        assert!(err.to_string().contains("first"));
    }

    #[test]
    fn test_defaults_and_clamping() {
        let query: PaginationQuery = serde_json::from_str("{}").expect("valid query");
        assert_eq!(query.normalized(), (1, 20));

        let query = PaginationQuery {
            page: -4,
            limit: 10_000,
        };
        assert_eq!(query.normalized(), (1, MAX_PAGE_LIMIT as u64));
    }
}
