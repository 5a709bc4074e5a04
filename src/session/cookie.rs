//! 会话 cookie
//!
//! 浏览器端唯一的持久状态是 bearer token，保存在 HttpOnly cookie 中。

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::ServiceRequest;
use actix_web::http::header::AUTHORIZATION;

use crate::config::AppConfig;

const BEARER_PREFIX: &str = "Bearer ";

/// 登录成功后写入的会话 cookie
pub fn session_cookie(token: &str) -> Cookie<'static> {
    let config = AppConfig::get();
    Cookie::build(config.session.cookie_name.clone(), token.to_string())
        .path("/")
        .http_only(true)
        .secure(config.session.secure_cookie)
        .same_site(SameSite::Lax)
        .finish()
}

/// 清除会话 cookie
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie("");
    cookie.make_removal();
    cookie
}

fn bearer_header(value: Option<&str>) -> Option<String> {
    value
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// 读取令牌：优先 cookie，其次 `Authorization: Bearer` 请求头
pub fn token_from_service_request(req: &ServiceRequest) -> Option<String> {
    token_from_request(req.request())
}

pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    let config = AppConfig::get();
    req.cookie(&config.session.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| {
            bearer_header(
                req.headers()
                    .get(AUTHORIZATION)
                    .and_then(|h| h.to_str().ok()),
            )
        })
}
