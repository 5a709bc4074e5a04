//! 周类型权重汇总与列描述

use crate::models::matrix::responses::ColumnDescriptor;
use crate::models::weeks::entities::WeekTypeDefinition;

/// 所有周类型的权重之和，空集合为 0
pub fn total_weight(week_types: &[WeekTypeDefinition]) -> f64 {
    // 空集合必须得到 +0.0，f64 的 sum 会得到 -0.0
    week_types.iter().fold(0.0, |acc, w| acc + w.percentage)
}

pub fn column_key(week_type_id: i64) -> String {
    format!("week_{week_type_id}")
}

/// 按获取顺序生成成绩矩阵的列
pub fn build_columns(week_types: &[WeekTypeDefinition]) -> Vec<ColumnDescriptor> {
    week_types
        .iter()
        .map(|w| ColumnDescriptor {
            key: column_key(w.id),
            label: format!("{}\n{}%", w.name, w.percentage),
            week_id: w.id,
            percentage: w.percentage,
        })
        .collect()
}
