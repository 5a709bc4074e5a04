use serde::{Deserialize, Serialize};

use crate::models::users::entities::User;

/// 上游登录接口可能返回的几种形状
///
/// 新的形状只需在这里增加一个分支。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoginResponseShape {
    Wrapped { data: TokenAndUser },
    Token { token: String, user: User },
    AccessToken { access_token: String, user: User },
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenAndUser {
    pub token: String,
    pub user: User,
}

/// 规范化后的登录结果
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSession {
    pub token: String,
    pub user: User,
}

impl From<LoginResponseShape> for LoginSession {
    fn from(shape: LoginResponseShape) -> Self {
        match shape {
            LoginResponseShape::Wrapped { data } => LoginSession {
                token: data.token,
                user: data.user,
            },
            LoginResponseShape::Token { token, user } => LoginSession { token, user },
            LoginResponseShape::AccessToken { access_token, user } => LoginSession {
                token: access_token,
                user,
            },
        }
    }
}

// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub redirect_to: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub user: User,
}

/// 会话失效时告知前端跳转的目标
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub redirect_to: String,
}
