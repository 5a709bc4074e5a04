use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::models::ApiResponse;
use crate::models::auth::RedirectResponse;
use crate::session::cookie::{removal_cookie, token_from_request};

/// 处理用户登出
/// 上游令牌不做撤销，只清除本地会话 cookie 与缓存的用户信息
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(token) = token_from_request(request) {
        if let Some(cache) = service.get_cache(request) {
            cache.invalidate(&token).await;
        }
        info!("Session cleared on logout");
    }

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(ApiResponse::success(
            RedirectResponse {
                redirect_to: service.get_config().session.login_path.clone(),
            },
            "Logout successful",
        )))
}
