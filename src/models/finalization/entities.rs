use serde::{Deserialize, Serialize};

use crate::models::common::number::{flag_as_int, lenient_f64, lenient_flag};
use crate::models::users::entities::User;

// 组员互评的四个方面
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemberGrade {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub keadilan: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kerjasama: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kredibilitas: f64,
}

impl MemberGrade {
    pub fn aspects(&self) -> [(&'static str, f64); 4] {
        [
            ("skill", self.skill),
            ("keadilan", self.keadilan),
            ("kerjasama", self.kerjasama),
            ("kredibilitas", self.kredibilitas),
        ]
    }
}

// 成绩定稿记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizationRecord {
    pub id: i64,
    pub user: User,
    #[serde(default, deserialize_with = "lenient_flag", serialize_with = "flag_as_int")]
    pub confirmed: bool,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub final_grade: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub project_grade: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub personal_grade: f64,
    #[serde(default)]
    pub member_grade: Option<MemberGrade>,
}
