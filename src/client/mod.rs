//! 上游 MonPAD REST API 客户端
//!
//! - 除登录外的每个请求都会附带 `Authorization: Bearer <token>`
//! - 成功响应自动拆除 `{data: ...}` 信封
//! - 失败响应按状态码分类，收到 401 时清除会话并触发全局回调

pub mod envelope;
pub mod resources;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

pub use resources::Resource;
pub use transport::{
    ApiRequest, Method, RawResponse, RequestBody, ReqwestTransport, Transport, UploadFile,
};

use crate::errors::{MonpadError, Result};
use crate::session::SessionStore;

/// 单次调用的选项
#[derive(Debug, Clone, Copy)]
pub struct CallOptions {
    /// 是否附带 bearer token
    pub authenticated: bool,
    /// 422 时保留的提示条数
    pub message_limit: usize,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            authenticated: true,
            message_limit: 1,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<dyn SessionStore>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// 发送请求并返回原始响应，非 2xx 响应转换为错误
    pub async fn execute(&self, mut request: ApiRequest, options: CallOptions) -> Result<RawResponse> {
        if options.authenticated {
            request.bearer = self.session.get_token();
        }

        let method = request.method;
        let path = request.path.clone();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed without response: {}", method, path, e);
                return Err(match e {
                    MonpadError::Network(_) => e,
                    other => MonpadError::network(other.message().to_string()),
                });
            }
        };

        if response.is_success() {
            debug!("{} {} -> {}", method, path, response.status);
            return Ok(response);
        }

        let error = envelope::classify_failure(response.status, &response.body, options.message_limit);
        if let MonpadError::Unauthorized(_) = error {
            info!("{} {} returned 401, clearing session", method, path);
            self.session.notify_unauthorized();
        } else {
            warn!("{} {} -> {}: {}", method, path, response.status, error);
        }
        Err(error)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(request, CallOptions::default()).await?;
        envelope::decode(&response.body)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(ApiRequest::new(Method::Get, path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send_json(ApiRequest::new(Method::Post, path).json(body)).await
    }

    /// 不带请求体的 POST
    pub async fn post_empty(&self, path: &str) -> Result<Value> {
        self.send_json(ApiRequest::new(Method::Post, path)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send_json(ApiRequest::new(Method::Put, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(ApiRequest::new(Method::Delete, path), CallOptions::default())
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::session::MemorySession;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client_with(mock: Arc<MockTransport>, token: Option<&str>) -> ApiClient {
        let session = match token {
            Some(token) => MemorySession::with_token(token),
            None => MemorySession::new(),
        };
        ApiClient::new(mock, Arc::new(session))
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Get, "/project", 200, json!({"data": []}));
        let client = client_with(mock.clone(), Some("abc123"));

        let projects: Vec<Value> = client.list(Resource::Project).await.unwrap();
        assert!(projects.is_empty());
        assert_eq!(mock.requests()[0].bearer.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_bare_payload_accepted() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Get, "/group", 200, json!([{"id": 1}]));
        let client = client_with(mock, Some("abc123"));

        let groups: Vec<Value> = client.list(Resource::Group).await.unwrap();
        assert_eq!(groups, vec![json!({"id": 1})]);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_fires_callback() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Get, "/week", 401, json!({"message": "Unauthenticated."}));
        let client = client_with(mock, Some("abc123"));

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        client.session().on_unauthorized(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let result: Result<Vec<Value>> = client.list(Resource::Week).await;
        assert!(matches!(result, Err(MonpadError::Unauthorized(_))));
        assert!(client.session().get_token().is_none());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_network_failure_is_classified() {
        let mock = Arc::new(MockTransport::new());
        mock.fail(Method::Get, "/project", "connection refused");
        let client = client_with(mock, Some("abc123"));

        let result: Result<Vec<Value>> = client.list(Resource::Project).await;
        assert!(matches!(result, Err(MonpadError::Network(_))));
        // 网络错误不影响会话
        assert!(client.session().get_token().is_some());
    }

    #[tokio::test]
    async fn test_unauthenticated_call_has_no_bearer() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Post, "/login", 200, json!({"token": "t"}));
        let client = client_with(mock.clone(), Some("stale"));

        let options = CallOptions {
            authenticated: false,
            ..Default::default()
        };
        client
            .execute(ApiRequest::new(Method::Post, "/login"), options)
            .await
            .unwrap();
        assert!(mock.requests()[0].bearer.is_none());
    }
}
