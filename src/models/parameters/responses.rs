use serde::Serialize;

use crate::models::weeks::entities::{GradeTypeDefinition, WeekTypeDefinition};

#[derive(Debug, Clone, Serialize)]
pub struct ParameterOutcome {
    pub week_type: WeekTypeDefinition,
    /// 本次新建的评分方面 id
    pub created_aspects: Vec<i64>,
    /// 按原顺序提交的全部评分方面 id
    pub grade_types: Vec<i64>,
}

// 参数页概览：已有周类型、可复用的评分方面与剩余权重
#[derive(Debug, Clone, Serialize)]
pub struct ParameterOverview {
    pub total_weight: f64,
    pub remaining_weight: f64,
    pub week_types: Vec<WeekTypeDefinition>,
    pub grade_types: Vec<GradeTypeDefinition>,
}
