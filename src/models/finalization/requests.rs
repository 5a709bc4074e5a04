use serde::Deserialize;

// 切换定稿状态；学生尚无定稿记录时 finalization_id 为空
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleFinalizationRequest {
    pub user_id: i64,
    #[serde(default)]
    pub finalization_id: Option<i64>,
}
