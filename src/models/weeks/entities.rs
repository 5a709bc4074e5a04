use serde::{Deserialize, Serialize};

use crate::models::common::number::lenient_f64;

// 周类型：一个评分周期及其权重
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekTypeDefinition {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grade_types: Vec<GradeTypeDefinition>,
}

// 评分方面 (aspect)，可被多个周类型复用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradeTypeDefinition {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradeEntry {
    pub grade_type: GradeTypeDefinition,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub grade: f64,
}

// 周记录：助教创建，讲师审阅
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekRecord {
    pub id: i64,
    pub project_id: i64,
    #[serde(default)]
    pub week_type: Option<WeekTypeDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_type_id: Option<i64>,
    #[serde(default)]
    pub grades: Vec<GradeEntry>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_grade: f64,
    #[serde(default)]
    pub review: Option<serde_json::Value>,
}

impl WeekRecord {
    /// 嵌套的 week_type 优先，其次是扁平的 week_type_id
    pub fn week_type_id(&self) -> Option<i64> {
        self.week_type.as_ref().map(|w| w.id).or(self.week_type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_record_with_nested_week_type() {
        let record: WeekRecord = serde_json::from_str(
            r#"{"id": 3, "project_id": 7, "week_type": {"id": 1, "name": "Minggu 1", "percentage": "40"},
                "grades": [{"grade_type": {"id": 9, "name": "Progress", "percentage": 100}, "grade": "85"}],
                "total_grade": "85.00"}"#,
        )
        .unwrap();
        assert_eq!(record.week_type_id(), Some(1));
        assert_eq!(record.total_grade, 85.0);
        assert_eq!(record.grades[0].grade, 85.0);
    }

    #[test]
    fn test_week_record_with_flat_week_type_id() {
        let record: WeekRecord =
            serde_json::from_str(r#"{"id": 3, "project_id": 7, "week_type_id": 2}"#).unwrap();
        assert_eq!(record.week_type_id(), Some(2));
        assert_eq!(record.total_grade, 0.0);
    }
}
