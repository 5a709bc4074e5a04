//! 小组成员管理
//!
//! “一个学生只属于一个小组”只是界面层面的约束，上游仍可能返回违反它的数据，
//! 这里只用于候选过滤与提交前的提示。

use std::collections::HashSet;

use tracing::info;

use crate::client::{ApiClient, Resource};
use crate::errors::{MonpadError, Result};
use crate::models::groups::entities::Group;
use crate::models::groups::requests::AddMembersRequest;
use crate::models::users::entities::User;

pub fn members_path(group_id: i64) -> String {
    format!("{}/members", Resource::Group.item_path(group_id))
}

pub async fn list_members(client: &ApiClient, group_id: i64) -> Result<Vec<User>> {
    let members: Option<Vec<User>> = client.get(&members_path(group_id)).await?;
    Ok(members.unwrap_or_default())
}

/// 尚未加入任何小组的学生，保持名单原有顺序
pub fn available_students(students: Vec<User>, groups: &[Group]) -> Vec<User> {
    let assigned: HashSet<i64> = groups
        .iter()
        .flat_map(|g| g.members.iter().map(|m| m.id))
        .collect();
    students
        .into_iter()
        .filter(|s| !assigned.contains(&s.id))
        .collect()
}

pub async fn load_candidates(client: &ApiClient) -> Result<Vec<User>> {
    let (students, groups) = tokio::try_join!(
        client.list::<User>(Resource::Mahasiswa),
        client.list::<Group>(Resource::Group),
    )?;
    Ok(available_students(students, &groups))
}

/// 目标小组之外已有归属的学生，返回第一条冲突
fn find_conflict(groups: &[Group], group_id: i64, user_ids: &[i64]) -> Option<(i64, String)> {
    groups
        .iter()
        .filter(|g| g.id != group_id)
        .find_map(|g| {
            user_ids
                .iter()
                .find(|id| g.has_member(**id))
                .map(|id| (*id, g.name.clone()))
        })
}

pub async fn add_members(
    client: &ApiClient,
    group_id: i64,
    request: AddMembersRequest,
) -> Result<Vec<User>> {
    let mut user_ids = Vec::with_capacity(request.user_ids.len());
    for id in request.user_ids {
        if !user_ids.contains(&id) {
            user_ids.push(id);
        }
    }
    if user_ids.is_empty() {
        return Err(MonpadError::validation("Select at least one student"));
    }

    let groups: Vec<Group> = client.list(Resource::Group).await?;
    if !groups.iter().any(|g| g.id == group_id) {
        return Err(MonpadError::not_found(format!("Group {group_id}")));
    }
    if let Some((user_id, group_name)) = find_conflict(&groups, group_id, &user_ids) {
        return Err(MonpadError::validation(format!(
            "Student {user_id} already belongs to {group_name}"
        )));
    }

    let _: serde_json::Value = client
        .post(&members_path(group_id), &AddMembersRequest { user_ids: user_ids.clone() })
        .await?;
    info!("Added {} members to group {}", user_ids.len(), group_id);

    list_members(client, group_id).await
}
