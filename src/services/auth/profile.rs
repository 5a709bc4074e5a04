use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use tracing::debug;

use super::AuthService;
use crate::cache::UserCache;
use crate::client::ApiClient;
use crate::errors::{MonpadError, Result};
use crate::middlewares::RequireSession;
use crate::models::ApiResponse;
use crate::models::auth::responses::UserInfoResponse;
use crate::models::users::entities::User;
use crate::services::request_client;

/// `/auth/me` 的两种形状
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CurrentUserShape {
    Wrapped { user: User },
    Bare(User),
}

impl From<CurrentUserShape> for User {
    fn from(shape: CurrentUserShape) -> Self {
        match shape {
            CurrentUserShape::Wrapped { user } | CurrentUserShape::Bare(user) => user,
        }
    }
}

pub async fn fetch_current_user(client: &ApiClient) -> Result<User> {
    let shape: CurrentUserShape = client.get("/auth/me").await?;
    Ok(shape.into())
}

/// 解析会话用户：先查缓存，未命中时请求上游并写回
pub async fn resolve_user(
    client: &ApiClient,
    cache: Option<&UserCache>,
    token: &str,
) -> Result<User> {
    if let Some(cache) = cache
        && let Some(user) = cache.get(token).await
    {
        debug!("Session user {} served from cache", user.id);
        return Ok(user);
    }

    let user = fetch_current_user(client).await?;
    if let Some(cache) = cache {
        cache.insert(token, user.clone()).await;
    }
    Ok(user)
}

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(user) = RequireSession::extract_user(request) {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        )));
    }

    let result = async {
        let client = request_client(request)?;
        let token = RequireSession::extract_token(request)
            .ok_or_else(|| MonpadError::unauthorized("No session attached to this request"))?;
        let cache = service.get_cache(request);
        resolve_user(&client, cache.as_ref(), &token).await
    }
    .await;

    match result {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
