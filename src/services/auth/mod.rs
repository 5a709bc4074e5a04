pub mod login;
pub mod logout;
pub mod profile;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::UserCache;
use crate::client::{ApiClient, Transport};
use crate::config::AppConfig;
use crate::errors::{MonpadError, Result};
use crate::session::MemorySession;

pub struct AuthService {
    transport: Option<Arc<dyn Transport>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { transport: None }
    }

    /// 登录前还没有会话，用空槽位构建客户端
    pub(crate) fn anonymous_client(&self, request: &HttpRequest) -> Result<ApiClient> {
        let transport = match &self.transport {
            Some(transport) => transport.clone(),
            None => request
                .app_data::<web::Data<Arc<dyn Transport>>>()
                .map(|data| data.get_ref().clone())
                .ok_or_else(|| {
                    MonpadError::configuration("Upstream transport not found in app data")
                })?,
        };
        Ok(ApiClient::new(transport, Arc::new(MemorySession::new())))
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<UserCache> {
        request
            .app_data::<web::Data<UserCache>>()
            .map(|data| data.get_ref().clone())
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录
    pub async fn login(
        &self,
        login_request: crate::models::auth::LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 获取当前用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_get_user(self, request).await
    }

    // 登出
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }
}
