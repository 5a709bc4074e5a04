//! 成绩矩阵组装
//!
//! 纯函数：输入为已获取的周记录、小组、项目与列描述，输出每个小组一行。
//! 不修改输入，相同输入得到完全相同的输出。

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::models::groups::entities::Group;
use crate::models::matrix::responses::{ColumnDescriptor, MatrixRow};
use crate::models::projects::entities::Project;
use crate::models::weeks::entities::WeekRecord;

const MISSING: &str = "-";

/// (project_id, week_type_id) 到周成绩的索引
///
/// 同一项目同一周类型存在多条记录时取 id 最小的一条，保证结果与记录顺序无关。
pub struct WeekGradeIndex {
    grades: HashMap<(i64, i64), (i64, f64)>,
}

impl WeekGradeIndex {
    pub fn new(records: &[WeekRecord]) -> Self {
        let mut grades: HashMap<(i64, i64), (i64, f64)> = HashMap::new();
        for record in records {
            let Some(week_type_id) = record.week_type_id() else {
                continue;
            };
            grades
                .entry((record.project_id, week_type_id))
                .and_modify(|current| {
                    if record.id < current.0 {
                        *current = (record.id, record.total_grade);
                    }
                })
                .or_insert((record.id, record.total_grade));
        }
        Self { grades }
    }

    /// 没有匹配记录时为 0
    pub fn grade(&self, project_id: i64, week_type_id: i64) -> f64 {
        self.grades
            .get(&(project_id, week_type_id))
            .map(|(_, grade)| *grade)
            .unwrap_or(0.0)
    }
}

/// 加权总分，保留两位小数
pub fn weighted_total(week_grades: &IndexMap<String, f64>, columns: &[ColumnDescriptor]) -> String {
    let total = columns.iter().fold(0.0, |acc, col| {
        acc + week_grades.get(&col.key).copied().unwrap_or(0.0) * col.percentage / 100.0
    });
    format!("{total:.2}")
}

pub fn assemble_row(
    group: &Group,
    projects: &[Project],
    index: &WeekGradeIndex,
    columns: &[ColumnDescriptor],
) -> MatrixRow {
    let nama_proyek = projects
        .iter()
        .find(|p| p.id == group.project_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| MISSING.to_string());

    let week_grades: IndexMap<String, f64> = columns
        .iter()
        .map(|col| (col.key.clone(), index.grade(group.project_id, col.week_id)))
        .collect();
    let total_skor = weighted_total(&week_grades, columns);

    MatrixRow {
        id: group.id,
        kelompok_id: group.name.clone(),
        nama_proyek,
        project_id: group.project_id,
        week_grades,
        total_skor,
    }
}

pub fn assemble_rows(
    groups: &[Group],
    projects: &[Project],
    records: &[WeekRecord],
    columns: &[ColumnDescriptor],
) -> Vec<MatrixRow> {
    let index = WeekGradeIndex::new(records);
    groups
        .iter()
        .map(|group| assemble_row(group, projects, &index, columns))
        .collect()
}
