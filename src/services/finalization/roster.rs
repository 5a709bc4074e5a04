//! 学生名单与定稿记录的合并

use std::collections::HashMap;

use crate::client::{ApiClient, Resource};
use crate::errors::Result;
use crate::models::finalization::entities::FinalizationRecord;
use crate::models::finalization::responses::{FinalizationStatus, RosterEntry};
use crate::models::users::entities::User;

/// 按 user.id 合并；没有定稿记录的学生显示为未确认、0 分且不可切换
pub fn join_roster(students: Vec<User>, records: &[FinalizationRecord]) -> Vec<RosterEntry> {
    let by_user: HashMap<i64, &FinalizationRecord> =
        records.iter().map(|r| (r.user.id, r)).collect();

    students
        .into_iter()
        .map(|user| match by_user.get(&user.id) {
            Some(record) => RosterEntry {
                finalization_id: Some(record.id),
                confirmed: record.confirmed,
                final_grade: record.final_grade,
                project_grade: record.project_grade,
                personal_grade: record.personal_grade,
                member_grade: record.member_grade.clone(),
                status: if record.confirmed {
                    FinalizationStatus::Final
                } else {
                    FinalizationStatus::Draft
                },
                user,
            },
            None => RosterEntry {
                user,
                finalization_id: None,
                confirmed: false,
                final_grade: 0.0,
                project_grade: 0.0,
                personal_grade: 0.0,
                member_grade: None,
                status: FinalizationStatus::Draft,
            },
        })
        .collect()
}

/// 完整获取名单与定稿记录
pub async fn load_roster(client: &ApiClient) -> Result<Vec<RosterEntry>> {
    let (students, records) = tokio::try_join!(
        client.list::<User>(Resource::Mahasiswa),
        client.list::<FinalizationRecord>(Resource::Finalization),
    )?;
    Ok(join_roster(students, &records))
}
