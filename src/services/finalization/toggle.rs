//! 切换学生成绩的定稿状态
//!
//! 只发送空请求体，翻转语义由上游决定；成功后完整重新获取名单，不做本地乐观更新。

use tracing::info;

use super::roster::load_roster;
use crate::client::{ApiClient, Resource};
use crate::errors::{MonpadError, Result};
use crate::models::finalization::requests::ToggleFinalizationRequest;
use crate::models::finalization::responses::RosterEntry;

pub const NO_RECORD_MESSAGE: &str =
    "This student has no finalization record yet, so the grade cannot be finalized";

pub async fn toggle_finalization(
    client: &ApiClient,
    request: &ToggleFinalizationRequest,
) -> Result<Vec<RosterEntry>> {
    let Some(finalization_id) = request.finalization_id else {
        return Err(MonpadError::validation(NO_RECORD_MESSAGE));
    };

    client
        .post_empty(&Resource::Finalization.item_path(finalization_id))
        .await?;
    info!(
        "Finalization {} toggled for student {}",
        finalization_id, request.user_id
    );

    load_roster(client).await
}

/// 依据已加载的名单解析定稿记录 id，再切换
pub async fn toggle_for_student(
    client: &ApiClient,
    roster: &[RosterEntry],
    user_id: i64,
) -> Result<Vec<RosterEntry>> {
    let finalization_id = roster
        .iter()
        .find(|entry| entry.user.id == user_id)
        .and_then(|entry| entry.finalization_id);
    toggle_finalization(
        client,
        &ToggleFinalizationRequest {
            user_id,
            finalization_id,
        },
    )
    .await
}
