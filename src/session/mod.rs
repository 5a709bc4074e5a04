//! 会话令牌存储
//!
//! 浏览器端只保存一个 bearer token。服务端以单槽位的 [`SessionStore`]
//! 表示它，并注入到 [`crate::client::ApiClient`] 中，而不是作为全局可变状态。

pub mod cookie;

use std::sync::{Arc, RwLock};

use sha2::{Digest, Sha256};
use tracing::debug;

pub type UnauthorizedCallback = Arc<dyn Fn() + Send + Sync>;

pub trait SessionStore: Send + Sync {
    /// 读取当前令牌
    fn get_token(&self) -> Option<String>;
    /// 写入令牌（覆盖旧值）
    fn set_token(&self, token: String);
    /// 清除会话，槽位为空时无操作
    fn clear_session(&self);
    /// 注册 401 回调
    fn on_unauthorized(&self, callback: UnauthorizedCallback);
    /// 由 HTTP 客户端在收到 401 时调用：清除令牌并通知所有回调
    fn notify_unauthorized(&self);
}

/// 令牌的 SHA-256 摘要，用于日志与内存中的键，原始令牌不出现在其中
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// 单槽位内存会话
#[derive(Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
    callbacks: RwLock<Vec<UnauthorizedCallback>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.get_token().is_some()
    }
}

impl SessionStore for MemorySession {
    fn get_token(&self) -> Option<String> {
        self.token
            .read()
            .map(|slot| slot.clone())
            .unwrap_or_default()
    }

    fn set_token(&self, token: String) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token);
        }
    }

    fn clear_session(&self) {
        if let Ok(mut slot) = self.token.write() {
            if slot.take().is_some() {
                debug!("Session token cleared");
            }
        }
    }

    fn on_unauthorized(&self, callback: UnauthorizedCallback) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.push(callback);
        }
    }

    fn notify_unauthorized(&self) {
        self.clear_session();
        // 复制一份再调用，回调内部可以再次访问会话
        let callbacks: Vec<UnauthorizedCallback> = self
            .callbacks
            .read()
            .map(|callbacks| callbacks.clone())
            .unwrap_or_default();
        for callback in callbacks {
            callback();
        }
    }
}
