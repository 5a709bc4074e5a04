use serde::{Deserialize, Serialize};

use crate::models::users::entities::User;

// 小组 (kelompok)，属于且仅属于一个项目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub project_id: i64,
    #[serde(default)]
    pub members: Vec<User>,
}

impl Group {
    pub fn has_member(&self, user_id: i64) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }
}
