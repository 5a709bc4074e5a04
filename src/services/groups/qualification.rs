//! 组员互评（qualification）
//!
//! 四个方面：skill、keadilan、kerjasama、kredibilitas，每项 0..=100。

use serde_json::Value;
use tracing::info;

use super::members::members_path;
use crate::client::ApiClient;
use crate::errors::{MonpadError, Result};
use crate::models::finalization::entities::MemberGrade;
use crate::utils::validate::validate_score;

pub fn qualification_path(group_id: i64, member_id: i64) -> String {
    format!("{}/{member_id}/qualification", members_path(group_id))
}

pub fn validate_member_grade(grade: &MemberGrade) -> Result<()> {
    for (aspect, value) in grade.aspects() {
        validate_score(aspect, value).map_err(MonpadError::validation)?;
    }
    Ok(())
}

pub async fn get_qualification(
    client: &ApiClient,
    group_id: i64,
    member_id: i64,
) -> Result<Option<MemberGrade>> {
    client.get(&qualification_path(group_id, member_id)).await
}

pub async fn submit_qualification(
    client: &ApiClient,
    group_id: i64,
    member_id: i64,
    grade: MemberGrade,
) -> Result<MemberGrade> {
    validate_member_grade(&grade)?;

    let saved: Value = client
        .post(&qualification_path(group_id, member_id), &grade)
        .await?;
    info!("Qualification saved for member {} of group {}", member_id, group_id);

    // 上游可能只返回提示信息，此时以提交的内容为准
    if saved.get("skill").is_none() {
        return Ok(grade);
    }
    serde_json::from_value(saved)
        .map_err(|e| MonpadError::response_shape(format!("Unexpected qualification payload: {e}")))
}
