pub mod auth;
pub mod finalization;
pub mod groups;
pub mod matrix;
pub mod parameters;
pub mod resources;
pub mod students;
pub mod weeks;
pub mod weights;

pub use auth::AuthService;
pub use finalization::FinalizationService;
pub use groups::GroupService;
pub use matrix::MatrixService;
pub use parameters::ParameterService;
pub use resources::ResourceService;
pub use students::StudentService;
pub use weeks::WeekService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;

use crate::client::ApiClient;
use crate::errors::{MonpadError, Result};
use crate::middlewares::RequireSession;
use crate::models::ApiResponse;

/// 取出 RequireSession 为本次请求构建的上游客户端
pub(crate) fn request_client(request: &HttpRequest) -> Result<ApiClient> {
    RequireSession::extract_client(request)
        .ok_or_else(|| MonpadError::unauthorized("No session attached to this request"))
}

/// 把服务结果包装为统一响应，错误按分类映射状态码
pub(crate) fn respond<T: Serialize>(result: Result<T>, message: &str) -> ActixResult<HttpResponse> {
    match result {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data, message))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
