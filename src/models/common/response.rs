use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::error;
use ts_rs::TS;

use crate::errors::PortalError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 领域错误对应的 HTTP 状态码
///
/// - `FormClosed` → 403
/// - `NotFound` → 404
/// - `Validation` → 400
/// - `Conflict` → 409
/// - 其余（含 `TransactionAborted`）→ 500
pub fn status_for(err: &PortalError) -> StatusCode {
    match err {
        PortalError::FormClosed(_) => StatusCode::FORBIDDEN,
        PortalError::NotFound(_) => StatusCode::NOT_FOUND,
        PortalError::Validation(_) => StatusCode::BAD_REQUEST,
        PortalError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn default_code(err: &PortalError) -> ErrorCode {
    match err {
        PortalError::FormClosed(_) => ErrorCode::FeedbackFormClosed,
        PortalError::NotFound(_) => ErrorCode::NotFound,
        PortalError::Validation(_) => ErrorCode::BadRequest,
        PortalError::Conflict(_) => ErrorCode::Conflict,
        _ => ErrorCode::InternalServerError,
    }
}

/// 将领域错误映射为 HTTP 响应
pub fn error_response(err: &PortalError) -> HttpResponse {
    error_response_with_code(err, default_code(err))
}

/// 同 [`error_response`]，但使用调用方指定的业务错误码
pub fn error_response_with_code(err: &PortalError, code: ErrorCode) -> HttpResponse {
    let status = status_for(err);
    if status.is_server_error() {
        // 服务端错误原样透传错误信息
        error!("{}", err);
        HttpResponse::build(status).json(ApiResponse::error_empty(code, err.format_simple()))
    } else {
        HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&PortalError::form_closed("closed")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(&PortalError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&PortalError::validation("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&PortalError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&PortalError::transaction_aborted("disk I/O error")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_envelope_carries_code() {
        let response = error_response_with_code(
            &PortalError::conflict("already closed"),
            ErrorCode::FeedbackRoundNotActive,
        );
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = ApiResponse::error_empty(ErrorCode::FeedbackRoundNotActive, "already closed");
        let value = serde_json::to_value(&body).expect("serializable");
        assert_eq!(value["code"], 2003);
        assert!(value.get("data").is_none());
    }
}
