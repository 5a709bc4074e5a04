//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 上游 API 的失败按照网络、校验(422)、未授权(401)、资源缺失(404)、
//! 操作不允许(405)、服务端(5xx)分类。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_monpad_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:expr)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum MonpadError {
            $($variant(String),)*
        }

        impl MonpadError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(MonpadError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(MonpadError::$variant(_) => $type_name,)*
                }
            }

            /// 获取对应的 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(MonpadError::$variant(_) => $status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(MonpadError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl MonpadError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        MonpadError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_monpad_errors! {
    Network("E001", "Network Error", StatusCode::BAD_GATEWAY),
    Validation("E002", "Validation Error", StatusCode::UNPROCESSABLE_ENTITY),
    Unauthorized("E003", "Session Expired", StatusCode::UNAUTHORIZED),
    NotFound("E004", "Resource Not Found", StatusCode::NOT_FOUND),
    NotPermitted("E005", "Operation Not Permitted", StatusCode::METHOD_NOT_ALLOWED),
    Upstream("E006", "Upstream Server Error", StatusCode::BAD_GATEWAY),
    BadRequest("E007", "Bad Request", StatusCode::BAD_REQUEST),
    Forbidden("E008", "Forbidden", StatusCode::FORBIDDEN),
    Serialization("E009", "Serialization Error", StatusCode::INTERNAL_SERVER_ERROR),
    ResponseShape("E010", "Unexpected Response Shape", StatusCode::BAD_GATEWAY),
    Configuration("E011", "Configuration Error", StatusCode::INTERNAL_SERVER_ERROR),
    FileOperation("E012", "File Operation Error", StatusCode::INTERNAL_SERVER_ERROR),
}

impl MonpadError {
    /// 面向用户的提示语
    pub fn user_message(&self) -> String {
        match self {
            MonpadError::Network(_) => {
                "Unable to reach the MonPAD server, please check your connection and try again"
                    .to_string()
            }
            MonpadError::NotFound(msg) => {
                format!("The requested data no longer exists or was never created ({msg})")
            }
            MonpadError::NotPermitted(msg) => {
                format!("This operation is not allowed on the selected data ({msg})")
            }
            MonpadError::Upstream(msg) => {
                format!("The MonPAD server failed to process the request ({msg})")
            }
            MonpadError::Unauthorized(_) => "Your session has expired, please log in again".into(),
            other => other.message().to_string(),
        }
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for MonpadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for MonpadError {}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for MonpadError {
    fn from(err: std::io::Error) -> Self {
        MonpadError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for MonpadError {
    fn from(err: serde_json::Error) -> Self {
        MonpadError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for MonpadError {
    fn from(err: reqwest::Error) -> Self {
        MonpadError::Network(err.to_string())
    }
}

impl From<config::ConfigError> for MonpadError {
    fn from(err: config::ConfigError) -> Self {
        MonpadError::Configuration(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for MonpadError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        MonpadError::FileOperation(err.to_string())
    }
}

impl From<csv::Error> for MonpadError {
    fn from(err: csv::Error) -> Self {
        MonpadError::FileOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MonpadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(MonpadError::network("test").code(), "E001");
        assert_eq!(MonpadError::validation("test").code(), "E002");
        assert_eq!(MonpadError::unauthorized("test").code(), "E003");
        assert_eq!(MonpadError::not_permitted("test").code(), "E005");
    }

    #[test]
    fn test_error_status() {
        assert_eq!(
            MonpadError::validation("x").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(MonpadError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            MonpadError::not_permitted("x").status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_user_message_distinguishes_missing_and_forbidden() {
        let missing = MonpadError::not_found("week 3").user_message();
        let refused = MonpadError::not_permitted("week 3").user_message();
        assert!(missing.contains("no longer exists"));
        assert!(refused.contains("not allowed"));
        assert_ne!(missing, refused);
    }

    #[test]
    fn test_network_message_mentions_connection() {
        let err = MonpadError::network("connection refused");
        assert!(err.user_message().contains("check your connection"));
    }

    #[test]
    fn test_format_simple() {
        let err = MonpadError::validation("Percentage must be positive");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Percentage must be positive"));
    }
}
