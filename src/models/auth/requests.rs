use serde::{Deserialize, Serialize};

// 用户登录请求（来自HTTP请求，原样转发给上游）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// 邮箱或用户名
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}
