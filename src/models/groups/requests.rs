use serde::{Deserialize, Serialize};

// 添加小组成员
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddMembersRequest {
    pub user_ids: Vec<i64>,
}

// 小组列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupQuery {
    #[serde(default)]
    pub project_id: Option<i64>,
}
