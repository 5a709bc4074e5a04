use serde::{Deserialize, Serialize};

use crate::errors::MonpadError;

/// 面向前端的业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    NotPermitted = 1005,
    AuthFailed = 1006,
    FinalizationMissing = 2001,
    ParameterRejected = 2002,
    ImportFileInvalid = 3001,
    ExportFailed = 3002,
    UpstreamUnavailable = 5001,
    UpstreamError = 5002,
    InternalServerError = 5000,
}

impl From<&MonpadError> for ErrorCode {
    fn from(err: &MonpadError) -> Self {
        match err {
            MonpadError::Network(_) => ErrorCode::UpstreamUnavailable,
            MonpadError::Validation(_) => ErrorCode::ValidationFailed,
            MonpadError::Unauthorized(_) => ErrorCode::Unauthorized,
            MonpadError::NotFound(_) => ErrorCode::NotFound,
            MonpadError::NotPermitted(_) => ErrorCode::NotPermitted,
            MonpadError::Upstream(_) | MonpadError::ResponseShape(_) => ErrorCode::UpstreamError,
            MonpadError::BadRequest(_) => ErrorCode::BadRequest,
            MonpadError::Forbidden(_) => ErrorCode::Forbidden,
            MonpadError::Serialization(_)
            | MonpadError::Configuration(_)
            | MonpadError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
