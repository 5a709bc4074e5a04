/*!
 * 会话中间件
 *
 * 所有需要登录的 API 与页面都必须经过此中间件。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireSession;
 *
 * App::new().service(
 *     web::scope("/api/v1/matrix")
 *         .wrap(RequireSession)
 *         .route("", web::get().to(matrix_handler)),
 * );
 * ```
 *
 * 处理程序中取出本次请求的上游客户端：
 *
 * ```rust,ignore
 * async fn matrix_handler(req: HttpRequest) -> Result<HttpResponse> {
 *     let client = RequireSession::extract_client(&req);
 *     // ...
 * }
 * ```
 *
 * ## 流程
 *
 * 1. 从 cookie（或 `Authorization: Bearer` 请求头）读取令牌，缺失时跳转登录页
 * 2. 以该令牌构建单槽位会话与 [`ApiClient`]，放入请求扩展
 * 3. 处理程序执行期间任意上游请求返回 401，会话被清空并触发回调
 * 4. 回调触发后，响应被替换为清除 cookie 并跳转 `/login`
 */

use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error, info};

use super::{create_error_response, login_redirect};
use crate::cache::UserCache;
use crate::client::{ApiClient, Transport};
use crate::models::ErrorCode;
use crate::models::users::entities::User;
use crate::session::cookie::token_from_service_request;
use crate::session::{MemorySession, SessionStore};

#[derive(Clone)]
pub struct RequireSession;

/// 当前请求携带的令牌
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            let Some(token) = token_from_service_request(&req) else {
                info!("No session token for request to {}", req.path());
                let response = login_redirect(req.request(), "Login required");
                return Ok(req.into_response(response.map_into_right_body()));
            };

            let Some(transport) = req
                .app_data::<web::Data<Arc<dyn Transport>>>()
                .map(|data| data.get_ref().clone())
            else {
                error!("Upstream transport not found in app data");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Upstream client is not configured",
                    )
                    .map_into_right_body(),
                ));
            };
            let cache = req
                .app_data::<web::Data<UserCache>>()
                .map(|data| data.get_ref().clone());

            // 401 回调只负责记录，响应在处理程序结束后统一替换
            let expired = Arc::new(AtomicBool::new(false));
            let flag = expired.clone();
            let session = Arc::new(MemorySession::with_token(token.clone()));
            session.on_unauthorized(Arc::new(move || flag.store(true, Ordering::SeqCst)));

            req.extensions_mut()
                .insert(ApiClient::new(transport, session));
            req.extensions_mut().insert(SessionToken(token.clone()));

            let res = srv.call(req).await?;
            if !expired.load(Ordering::SeqCst) {
                return Ok(res.map_into_left_body());
            }

            info!(
                "Upstream rejected the session during {}, redirecting to login",
                res.request().path()
            );
            if let Some(cache) = cache {
                cache.invalidate(&token).await;
            }
            let response = login_redirect(
                res.request(),
                "Your session has expired, please log in again",
            );
            let (http_req, _) = res.into_parts();
            debug!("Session cookie removed for {}", http_req.path());
            Ok(ServiceResponse::new(http_req, response).map_into_right_body())
        })
    }
}

// 辅助函数：从请求中提取会话信息
impl RequireSession {
    /// 提取本次请求的上游客户端
    /// 此函数应该在应用了RequireSession中间件的路由处理程序中使用
    pub fn extract_client(req: &HttpRequest) -> Option<ApiClient> {
        req.extensions().get::<ApiClient>().cloned()
    }

    pub fn extract_token(req: &HttpRequest) -> Option<String> {
        req.extensions()
            .get::<SessionToken>()
            .map(|token| token.0.clone())
    }

    /// 提取会话用户，仅在 RequireRole 之后可用
    pub fn extract_user(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::client::{Method, Resource};
    use crate::config::AppConfig;
    use crate::models::ApiResponse;
    use actix_web::cookie::Cookie;
    use actix_web::http::header::{LOCATION, SET_COOKIE};
    use actix_web::{App, HttpResponse, test};
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn list_projects(req: HttpRequest) -> HttpResponse {
        let Some(client) = RequireSession::extract_client(&req) else {
            return HttpResponse::InternalServerError().finish();
        };
        match client.list::<Value>(Resource::Project).await {
            Ok(projects) => HttpResponse::Ok().json(ApiResponse::success(projects, "ok")),
            Err(e) => ApiResponse::from_error(&e),
        }
    }

    fn session_cookie(token: &str) -> Cookie<'static> {
        Cookie::new(AppConfig::get().session.cookie_name.clone(), token.to_string())
    }

    macro_rules! app {
        ($mock:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($mock.clone() as Arc<dyn Transport>))
                    .app_data(web::Data::new(UserCache::new(10, Duration::from_secs(60))))
                    .service(
                        web::scope("/api/v1")
                            .wrap(RequireSession)
                            .route("/projects", web::get().to(list_projects)),
                    )
                    .service(
                        web::scope("/dosen")
                            .wrap(RequireSession)
                            .route("", web::get().to(list_projects)),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_token_on_api_is_401_with_redirect() {
        let mock = Arc::new(MockTransport::new());
        let app = app!(mock);

        let req = test::TestRequest::get().uri("/api/v1/projects").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");
        assert_eq!(mock.requests().len(), 0);
    }

    #[actix_web::test]
    async fn test_missing_token_on_page_redirects() {
        let mock = Arc::new(MockTransport::new());
        let app = app!(mock);

        let req = test::TestRequest::get().uri("/dosen").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");
    }

    #[actix_web::test]
    async fn test_token_is_forwarded_as_bearer() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Get, "/project", 200, json!({"data": [{"id": 1}]}));
        let app = app!(mock);

        let req = test::TestRequest::get()
            .uri("/api/v1/projects")
            .cookie(session_cookie("abc123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(mock.requests()[0].bearer.as_deref(), Some("abc123"));
    }

    #[actix_web::test]
    async fn test_upstream_401_clears_cookie_and_redirects() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Get, "/project", 401, json!({"message": "Unauthenticated."}));
        let app = app!(mock);

        let req = test::TestRequest::get()
            .uri("/api/v1/projects")
            .cookie(session_cookie("expired"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");

        let set_cookie = resp.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with(&format!("{}=", AppConfig::get().session.cookie_name)));

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["redirect_to"], "/login");
    }
}
