//! 测试用的脚本化传输层，记录所有请求以便断言请求次数与负载

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::transport::{ApiRequest, Method, RawResponse, Transport};
use crate::errors::{MonpadError, Result};

type Key = (Method, String);

#[derive(Default)]
pub(crate) struct MockTransport {
    scripted: Mutex<HashMap<Key, VecDeque<Result<RawResponse>>>>,
    sticky: Mutex<HashMap<Key, Result<RawResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 为 (method, path) 追加一个一次性响应，按追加顺序消费
    pub(crate) fn on_once(&self, method: Method, path: &str, status: u16, body: Value) {
        self.scripted
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(json_response(status, body)));
    }

    /// 为 (method, path) 设置一个可重复使用的响应
    pub(crate) fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.sticky
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Ok(json_response(status, body)));
    }

    pub(crate) fn on_bytes(&self, method: Method, path: &str, content_type: &str, body: Vec<u8>) {
        self.sticky.lock().unwrap().insert(
            (method, path.to_string()),
            Ok(RawResponse {
                status: 200,
                content_type: Some(content_type.to_string()),
                body,
            }),
        );
    }

    pub(crate) fn fail(&self, method: Method, path: &str, reason: &str) {
        self.sticky
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Err(MonpadError::network(reason)));
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub(crate) fn count_method(&self, method: Method) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

fn json_response(status: u16, body: Value) -> RawResponse {
    RawResponse {
        status,
        content_type: Some("application/json".to_string()),
        body: serde_json::to_vec(&body).unwrap(),
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        if let Some(response) = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
        {
            return response;
        }

        if let Some(response) = self.sticky.lock().unwrap().get(&key) {
            return response.clone();
        }

        Ok(json_response(
            404,
            serde_json::json!({"message": format!("no script for {} {}", key.0, key.1)}),
        ))
    }
}
