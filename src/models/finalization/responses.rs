use serde::Serialize;

use super::entities::MemberGrade;
use crate::models::common::number::flag_as_int;
use crate::models::users::entities::User;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FinalizationStatus {
    Draft,
    Final,
}

// 学生名单中的一行
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RosterEntry {
    pub user: User,
    pub finalization_id: Option<i64>,
    #[serde(serialize_with = "flag_as_int")]
    pub confirmed: bool,
    pub final_grade: f64,
    pub project_grade: f64,
    pub personal_grade: f64,
    pub member_grade: Option<MemberGrade>,
    pub status: FinalizationStatus,
}

impl RosterEntry {
    pub fn can_toggle(&self) -> bool {
        self.finalization_id.is_some()
    }
}
