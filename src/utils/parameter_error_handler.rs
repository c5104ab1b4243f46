//! 请求参数解析失败时的统一响应
//!
//! actix 默认返回纯文本错误，这里转换为 `ApiResponse` 信封并统一为 400。

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request<E>(err: E, message: String) -> Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("JSON payload rejected on {}: {}", req.path(), err);
    let message = format!("Invalid JSON body: {err}");
    bad_request(err, message)
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Query string rejected on {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    bad_request(err, message)
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    debug!("Path parameter rejected on {}: {}", req.path(), err);
    let message = format!("Invalid path parameter: {err}");
    bad_request(err, message)
}
