//! 客户端错误类型
//!
//! 每个变体对应一类用户可见的失败，`user_message` 给出提示文案。

use crate::request::{HttpResponse, TransportError};
use subconv_shared::ErrorBody;

pub const MSG_LOGIN_EXPIRED: &str = "登录已过期，请重新登录";
pub const MSG_AUTH_FAILED: &str = "认证失败，请检查用户名和密码";
pub const MSG_FORBIDDEN: &str = "没有权限访问该资源";
pub const MSG_NOT_FOUND: &str = "请求的资源不存在";
pub const MSG_VALIDATION: &str = "数据验证失败";
pub const MSG_SERVER: &str = "服务器内部错误";
pub const MSG_REQUEST_FAILED: &str = "请求失败";
pub const MSG_TIMEOUT: &str = "请求超时，请检查网络连接";
pub const MSG_NETWORK: &str = "网络连接失败，请检查网络";
pub const MSG_TRANSPORT: &str = "请求失败，请稍后重试";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized (401)")]
    Unauthorized { detail: Option<String> },
    #[error("forbidden (403)")]
    Forbidden,
    #[error("not found (404)")]
    NotFound,
    #[error("validation failed (422): {messages:?}")]
    Validation { messages: Option<Vec<String>> },
    #[error("server error ({status})")]
    Server { status: u16 },
    #[error("request failed ({status}): {detail:?}")]
    Status { status: u16, detail: Option<String> },
    #[error("request timed out")]
    Timeout,
    #[error("network unreachable: {0}")]
    Network(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 根据非 2xx 响应构造错误
    pub fn from_response(response: &HttpResponse) -> Self {
        let body = ErrorBody::parse(&response.body);
        let detail = body.message().map(str::to_string);
        match response.status {
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            422 => ApiError::Validation {
                messages: body
                    .field_messages()
                    .map(|msgs| msgs.into_iter().map(str::to_string).collect()),
            },
            500 => ApiError::Server { status: 500 },
            status => ApiError::Status { status, detail },
        }
    }

    /// HTTP 客户端是否已经为该错误弹出过提示
    ///
    /// 编解码错误与具体业务相关，由调用方给出提示。
    pub fn is_reported(&self) -> bool {
        !matches!(self, ApiError::Decode(_) | ApiError::Encode(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// 用户可见的提示文案
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => MSG_LOGIN_EXPIRED.to_string(),
            ApiError::Forbidden => MSG_FORBIDDEN.to_string(),
            ApiError::NotFound => MSG_NOT_FOUND.to_string(),
            ApiError::Validation {
                messages: Some(messages),
            } if !messages.is_empty() => messages.join(", "),
            ApiError::Validation { .. } => MSG_VALIDATION.to_string(),
            ApiError::Server { .. } => MSG_SERVER.to_string(),
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Status { .. } => MSG_REQUEST_FAILED.to_string(),
            ApiError::Timeout => MSG_TIMEOUT.to_string(),
            ApiError::Network(_) => MSG_NETWORK.to_string(),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Encode(_) => {
                MSG_TRANSPORT.to_string()
            }
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => ApiError::Timeout,
            TransportError::Network(msg) => ApiError::Network(msg),
            TransportError::Request(msg) => ApiError::Transport(msg),
        }
    }
}
