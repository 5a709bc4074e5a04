use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;
use tracing::{info, warn};

use super::AuthService;
use crate::client::{ApiClient, ApiRequest, CallOptions, Method, envelope};
use crate::errors::{MonpadError, Result};
use crate::models::auth::{LoginRequest, LoginResponse, LoginResponseShape, LoginSession};
use crate::models::{ApiResponse, ErrorCode};
use crate::session::cookie::session_cookie;
use crate::utils::validate::validate_required;

/// 把上游登录响应规范化为 `{token, user}`
pub fn parse_login_response(raw: Value) -> Result<LoginSession> {
    let shape: LoginResponseShape = serde_json::from_value(raw).map_err(|e| {
        MonpadError::response_shape(format!("Login response has no token and user: {e}"))
    })?;
    let session = LoginSession::from(shape);
    if session.token.trim().is_empty() {
        return Err(MonpadError::response_shape("Login response carried an empty token"));
    }
    Ok(session)
}

/// 登录成功后跳转的页面，没有角色时回到首页
pub fn landing_route(session: &LoginSession) -> String {
    session
        .user
        .role
        .as_ref()
        .map(|role| role.landing_path().to_string())
        .unwrap_or_else(|| "/".to_string())
}

/// 用凭据换取令牌并写入客户端会话
pub async fn login(client: &ApiClient, credentials: &LoginRequest) -> Result<LoginSession> {
    validate_required("Email", &credentials.email).map_err(MonpadError::validation)?;
    validate_required("Password", &credentials.password).map_err(MonpadError::validation)?;

    let request = ApiRequest::new(Method::Post, "/login").json(serde_json::to_value(credentials)?);
    let options = CallOptions {
        authenticated: false,
        ..Default::default()
    };
    let response = client.execute(request, options).await?;

    // 包装形状 `{data: {token, user}}` 由标签联合自己处理，这里不拆信封
    let session = parse_login_response(envelope::parse_body(&response.body)?)?;
    client.session().set_token(session.token.clone());
    Ok(session)
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let client = match service.anonymous_client(request) {
        Ok(client) => client,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    match login(&client, &login_request).await {
        Ok(session) => {
            info!("User {} logged in successfully", session.user.id);
            if let Some(cache) = service.get_cache(request) {
                cache.insert(&session.token, session.user.clone()).await;
            }

            let response = LoginResponse {
                redirect_to: landing_route(&session),
                user: session.user,
            };
            Ok(HttpResponse::Ok()
                .cookie(session_cookie(&session.token))
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(MonpadError::Unauthorized(_)) => {
            Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Email or password is incorrect",
            )))
        }
        Err(e) => {
            warn!(
                "Login against {} failed: {}",
                service.get_config().upstream.base_url,
                e
            );
            Ok(ApiResponse::from_error(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::models::users::entities::UserRole;
    use crate::session::{MemorySession, SessionStore};
    use serde_json::json;
    use std::sync::Arc;

    fn user_json() -> Value {
        json!({"id": 7, "name": "Rina", "role": "asisten", "nim": "1901"})
    }

    #[test]
    fn test_three_login_shapes_normalize_identically() {
        let token = parse_login_response(json!({"token": "abc123", "user": user_json()})).unwrap();
        let access =
            parse_login_response(json!({"access_token": "abc123", "user": user_json()})).unwrap();
        let wrapped =
            parse_login_response(json!({"data": {"token": "abc123", "user": user_json()}}))
                .unwrap();

        assert_eq!(token, access);
        assert_eq!(token, wrapped);
        assert_eq!(token.token, "abc123");
        assert_eq!(token.user.role, Some(UserRole::Asisten));
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let err = parse_login_response(json!({"jwt": "abc", "user": user_json()})).unwrap_err();
        assert!(matches!(err, MonpadError::ResponseShape(_)));

        let err = parse_login_response(json!({"token": "  ", "user": user_json()})).unwrap_err();
        assert!(matches!(err, MonpadError::ResponseShape(_)));
    }

    #[test]
    fn test_landing_route_by_role() {
        let session = parse_login_response(json!({"token": "t", "user": user_json()})).unwrap();
        assert_eq!(landing_route(&session), "/asisten");

        let session =
            parse_login_response(json!({"token": "t", "user": {"id": 1, "name": "x"}})).unwrap();
        assert_eq!(landing_route(&session), "/");
    }

    #[tokio::test]
    async fn test_login_stores_token_without_sending_bearer() {
        let mock = Arc::new(MockTransport::new());
        mock.on(
            Method::Post,
            "/login",
            200,
            json!({"access_token": "abc123", "user": user_json()}),
        );
        let session = Arc::new(MemorySession::new());
        let client = ApiClient::new(mock.clone(), session.clone());

        let credentials = LoginRequest {
            email: "rina@kampus.ac.id".into(),
            password: "secret".into(),
        };
        let result = login(&client, &credentials).await.unwrap();

        assert_eq!(result.token, "abc123");
        assert_eq!(session.get_token().as_deref(), Some("abc123"));
        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_empty_password_sends_nothing() {
        let mock = Arc::new(MockTransport::new());
        let client = ApiClient::new(mock.clone(), Arc::new(MemorySession::new()));

        let credentials = LoginRequest {
            email: "rina@kampus.ac.id".into(),
            password: String::new(),
        };
        let err = login(&client, &credentials).await.unwrap_err();
        assert!(matches!(err, MonpadError::Validation(_)));
        assert!(mock.requests().is_empty());
    }
}
