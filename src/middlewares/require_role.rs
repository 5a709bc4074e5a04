/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireSession 中间件之后使用。会话用户通过上游 `/auth/me`
 * 解析，并按令牌缓存。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::{RequireRole, RequireSession};
 * use crate::models::users::entities::UserRole;
 *
 * App::new().service(
 *     web::scope("/api/v1/finalization")
 *         .wrap(RequireRole::new(&UserRole::Dosen)) // 再验证角色
 *         .wrap(RequireSession)                     // 先验证会话
 *         .route("", web::get().to(roster_handler)),
 * );
 * ```
 *
 * 或者验证多个角色：
 *
 * ```rust,ignore
 * .wrap(RequireRole::new_any(UserRole::grader_roles()))  // 任一角色即可
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::{RequireSession, create_error_response};
use crate::cache::UserCache;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::auth::profile::resolve_user;

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: &UserRole) -> Self {
        Self {
            required_roles: vec![role.clone()],
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            let client = RequireSession::extract_client(req.request());
            let token = RequireSession::extract_token(req.request());

            let (Some(client), Some(token)) = (client, token) else {
                info!(
                    "Role check failed: no session found in request. Make sure RequireSession middleware is applied first."
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let cache = req
                .app_data::<web::Data<UserCache>>()
                .map(|data| data.get_ref().clone());

            let user = match resolve_user(&client, cache.as_ref(), &token).await {
                Ok(user) => user,
                // 401 由外层 RequireSession 转换为登录跳转
                Err(e) => {
                    return Ok(req.into_response(ApiResponse::from_error(&e).map_into_right_body()));
                }
            };

            let has_permission = required_roles.iter().any(|role| user.has_role(role));
            if !has_permission {
                info!(
                    "Access denied for user {} (role: {:?}). Required roles: {:?}",
                    user.id, user.role, required_roles
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        "Access denied.",
                    )
                    .map_into_right_body(),
                ));
            }

            req.extensions_mut().insert(user);
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}
