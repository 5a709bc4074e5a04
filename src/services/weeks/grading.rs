//! 助教录入周成绩

use std::collections::HashSet;

use tracing::info;

use crate::client::{ApiClient, Resource};
use crate::errors::{MonpadError, Result};
use crate::models::weeks::entities::{GradeTypeDefinition, WeekRecord, WeekTypeDefinition};
use crate::models::weeks::requests::{AspectGrade, UpdateWeekPayload, WeekGradeInput};
use crate::utils::validate::validate_score;

/// total = Σ grade × aspect.percentage / 100，保留两位小数
///
/// 未录入的方面按 0 计；重复或不属于该周类型的方面视为校验错误。
pub fn compute_total(grades: &[AspectGrade], aspects: &[GradeTypeDefinition]) -> Result<f64> {
    let mut seen = HashSet::new();
    let mut total = 0.0;

    for entry in grades {
        let aspect = aspects
            .iter()
            .find(|a| a.id == entry.grade_type_id)
            .ok_or_else(|| {
                MonpadError::validation(format!(
                    "Aspect {} does not belong to this week",
                    entry.grade_type_id
                ))
            })?;
        if !seen.insert(entry.grade_type_id) {
            return Err(MonpadError::validation(format!(
                "Aspect '{}' was graded more than once",
                aspect.name
            )));
        }
        validate_score(&aspect.name, entry.grade).map_err(MonpadError::validation)?;
        total += entry.grade * aspect.percentage / 100.0;
    }

    Ok((total * 100.0).round() / 100.0)
}

/// 周记录所属周类型的评分方面；记录里没有嵌套时单独获取周类型
async fn aspects_for(client: &ApiClient, record: &WeekRecord) -> Result<Vec<GradeTypeDefinition>> {
    if let Some(week_type) = &record.week_type
        && !week_type.grade_types.is_empty()
    {
        return Ok(week_type.grade_types.clone());
    }

    let week_type_id = record.week_type_id().ok_or_else(|| {
        MonpadError::response_shape(format!("Week {} has no week type", record.id))
    })?;
    let week_type: WeekTypeDefinition = client.fetch(Resource::WeekType, week_type_id).await?;
    Ok(week_type.grade_types)
}

pub async fn submit_week_grade(
    client: &ApiClient,
    week_id: i64,
    input: WeekGradeInput,
) -> Result<WeekRecord> {
    // 先做不依赖周类型的检查，避免无谓的请求
    for entry in &input.grades {
        validate_score(&format!("Aspect {}", entry.grade_type_id), entry.grade)
            .map_err(MonpadError::validation)?;
    }

    let record: WeekRecord = client.fetch(Resource::Week, week_id).await?;
    let aspects = aspects_for(client, &record).await?;
    let total_grade = compute_total(&input.grades, &aspects)?;

    let payload = UpdateWeekPayload {
        grades: input.grades,
        notes: input.notes.filter(|n| !n.trim().is_empty()),
        total_grade,
    };
    let updated: WeekRecord = client.update(Resource::Week, week_id, &payload).await?;
    info!("Week {} graded, total {:.2}", week_id, total_grade);
    Ok(updated)
}
