pub mod require_role;
pub mod require_session;

pub use require_role::RequireRole;
pub use require_session::RequireSession;

use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use actix_web::{HttpRequest, HttpResponse};

use crate::config::AppConfig;
use crate::models::auth::RedirectResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::session::cookie::removal_cookie;

// 辅助函数：创建错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()>::error_empty(code, message)),
    }
}

/// 会话缺失或失效时的响应
///
/// API 请求返回 401 与跳转目标，页面请求直接 303 到登录页，两者都会清除会话 cookie。
pub(crate) fn login_redirect(req: &HttpRequest, message: &str) -> HttpResponse {
    let login_path = AppConfig::get().session.login_path.clone();

    if req.path().starts_with("/api/") {
        HttpResponse::Unauthorized()
            .cookie(removal_cookie())
            .insert_header((LOCATION, login_path.clone()))
            .json(ApiResponse::error(
                ErrorCode::Unauthorized,
                RedirectResponse {
                    redirect_to: login_path,
                },
                message,
            ))
    } else {
        HttpResponse::SeeOther()
            .cookie(removal_cookie())
            .insert_header((LOCATION, login_path))
            .finish()
    }
}
