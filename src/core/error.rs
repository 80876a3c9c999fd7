//! 核心错误处理模块
//!
//! 所有失败都在处理器边界转换成 HTTP 状态码，响应体只包含标准的状态文本。

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::app::product::store::StoreError;

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    BadRequest(String),
    NotFound(String),
    UnsupportedMediaType(String),
    UnprocessableEntity(String),
    InternalServerError(String),
}

impl CoreError {
    /// 把存储层错误映射为 HTTP 错误，`context` 描述当前正在做的事情
    pub fn from_store(context: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => CoreError::NotFound(format!("{}: {}", context, err)),
            StoreError::Backend(_) => CoreError::InternalServerError(format!("{}: {}", context, err)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            CoreError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::BadRequest(msg)
            | CoreError::NotFound(msg)
            | CoreError::UnsupportedMediaType(msg)
            | CoreError::UnprocessableEntity(msg)
            | CoreError::InternalServerError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            CoreError::InternalServerError(msg) => error!("{}", msg),
            CoreError::BadRequest(msg)
            | CoreError::UnsupportedMediaType(msg)
            | CoreError::UnprocessableEntity(msg) => warn!("{}", msg),
            CoreError::NotFound(_) => {}
        }

        status_text_response(status)
    }
}

/// 纯文本错误响应，内容为状态码对应的标准描述
pub fn status_text_response(status: StatusCode) -> Response {
    let text = status.canonical_reason().unwrap_or("Unknown Status");
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response()
}
