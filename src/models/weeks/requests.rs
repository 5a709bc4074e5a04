use serde::{Deserialize, Serialize};

// 助教录入的单个方面成绩
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AspectGrade {
    pub grade_type_id: i64,
    pub grade: f64,
}

// 周成绩录入请求（来自HTTP请求）
#[derive(Debug, Clone, Deserialize)]
pub struct WeekGradeInput {
    pub grades: Vec<AspectGrade>,
    #[serde(default)]
    pub notes: Option<String>,
}

// 发送给上游的周记录更新
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpdateWeekPayload {
    pub grades: Vec<AspectGrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub total_grade: f64,
}

// 讲师审阅意见
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub review: String,
}

// 周记录列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeekQuery {
    #[serde(default)]
    pub project_id: Option<i64>,
}
