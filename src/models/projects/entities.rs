use serde::{Deserialize, Serialize};

use crate::models::common::datetime::lenient_datetime;
use crate::models::common::number::{flag_as_int, lenient_flag};
use crate::models::users::entities::User;

// 项目实体，由一名讲师负责，可有多名助教
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(default)]
    pub assistants: Vec<User>,
    #[serde(default, deserialize_with = "lenient_flag", serialize_with = "flag_as_int")]
    pub finalized: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}
