use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// =========================================================
// 错误类型枚举
// =========================================================

/// 错误类型枚举
/// 视图层据此决定展示方式：表单内联、toast 或空状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 传输层失败，没有收到响应
    Network,
    /// 401: 会话失效，已触发全局清理
    Unauthorized,
    /// 其它 4xx: 后端返回的校验/业务错误
    Validation,
    /// 404: 资源不存在
    NotFound,
    /// 5xx
    Server,
    /// 响应体无法解析
    Decode,
    /// 客户端配置无效
    Config,
    /// 登录被拒绝
    InvalidCredentials,
    /// 本地没有可用的 refresh token
    NoRefreshToken,
    /// 后端拒绝了 refresh token
    RefreshRejected,
}

impl ErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK_FAILURE",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Validation => "VALIDATION_FAILURE",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Server => "SERVER_ERROR",
            ErrorKind::Decode => "DECODE_ERROR",
            ErrorKind::Config => "INVALID_CONFIG",
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::NoRefreshToken => "NO_REFRESH_TOKEN",
            ErrorKind::RefreshRejected => "REFRESH_REJECTED",
        }
    }

    /// 根据 HTTP 状态码分类（仅用于非 2xx 响应）
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            400..=499 => ErrorKind::Validation,
            _ => ErrorKind::Server,
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// 操作名称，如 "GET /posts", "session.login"
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 访问层错误
///
/// - kind: 错误语义
/// - message: 后端消息或本地描述
/// - status: 原始 HTTP 状态码（如果有响应）
/// - spans: 调用追踪
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
            spans: Vec::new(),
        }
    }

    /// 由非 2xx 响应构造，优先使用响应体中的 `message`
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        let mut err = Self::new(ErrorKind::from_status(status), message);
        err.status = Some(status);
        err
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// 换成另一种语义，保留消息、状态码和追踪
    pub fn into_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    /// 面向用户的提示文本
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation | ErrorKind::InvalidCredentials => self.message.clone(),
            ErrorKind::Network => "Could not reach the server. Check your connection.".into(),
            ErrorKind::Unauthorized => "Your session has expired. Please sign in again.".into(),
            ErrorKind::NotFound => "Not found.".into(),
            ErrorKind::Server | ErrorKind::Decode => {
                "Something went wrong on the server. Try again.".into()
            }
            ErrorKind::Config => self.message.clone(),
            ErrorKind::NoRefreshToken | ErrorKind::RefreshRejected => {
                "Your session could not be renewed. Please sign in again.".into()
            }
        }
    }
}

/// 解析 NestJS 风格的错误体：`message` 可能是字符串或字符串数组
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let pick = |v: &Value| -> Option<String> {
        match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        }
    };
    value
        .get("message")
        .and_then(pick)
        .or_else(|| value.get("error").and_then(pick))
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 适配层错误
// =========================================================

/// HTTP 传输实现返回的错误
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("response read failed: {0}")]
    Body(String),
}

/// 键值存储实现返回的错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed for `{key}`: {reason}")]
    Write { key: String, reason: String },
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::network(e.to_string()).with_source(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::decode(e.to_string()).with_source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
    }

    #[test]
    fn test_message_from_string_body() {
        let err = ApiError::from_response(409, r#"{"statusCode":409,"message":"Email already in use"}"#);
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.status, Some(409));
        assert_eq!(err.message, "Email already in use");
        assert_eq!(err.user_message(), "Email already in use");
    }

    #[test]
    fn test_message_from_array_body() {
        let err = ApiError::from_response(
            400,
            r#"{"message":["email must be an email","password too short"],"error":"Bad Request"}"#,
        );
        assert_eq!(err.message, "email must be an email; password too short");
    }

    #[test]
    fn test_fallback_message_for_non_json_body() {
        let err = ApiError::from_response(502, "<html>bad gateway</html>");
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, "Request failed with status 502");
        assert!(err.user_message().contains("server"));
    }

    #[test]
    fn test_display_includes_trace() {
        let err = ApiError::network("connection refused")
            .in_op("GET /posts")
            .in_op_with("posts.list", "page=2");
        assert_eq!(
            err.to_string(),
            "[NETWORK_FAILURE] connection refused | trace: GET /posts -> posts.list(page=2)"
        );
    }

    #[test]
    fn test_transport_error_keeps_source() {
        use std::error::Error as _;
        let err: ApiError = TransportError::Network("reset".into()).into();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(err.source().is_some());
    }
}
