use serde::Serialize;

// 批量导入结果
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub file_name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}
