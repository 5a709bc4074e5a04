//! 添加参数（周类型 + 评分方面）提交流程
//!
//! 状态：Editing → Validating → Submitting → Submitted，校验失败进入 Rejected，
//! 提交途中失败进入 Aborted。所有本地校验都在第一个网络请求之前完成。

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::{ApiClient, Resource};
use crate::errors::{MonpadError, Result};
use crate::models::parameters::requests::{
    AddParameterRequest, CreateGradeTypePayload, CreateWeekTypePayload, PendingAspect,
};
use crate::models::parameters::responses::ParameterOutcome;
use crate::models::weeks::entities::{GradeTypeDefinition, WeekTypeDefinition};
use crate::services::weights::total_weight;
use crate::utils::validate::{is_exactly_hundred, percentages_sum, validate_required, within_hundred};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ParameterState {
    Editing,
    Validating,
    /// 正在创建第 `index` 个评分方面
    Submitting { index: usize },
    Submitted,
    Rejected(String),
    /// 提交中止，`orphaned` 为已创建但未挂到周类型上的评分方面
    Aborted { reason: String, orphaned: Vec<i64> },
}

/// 仅依赖表单内容的校验，不访问网络
pub fn validate_local(request: &AddParameterRequest) -> std::result::Result<String, String> {
    let label = request.week_label.as_deref().unwrap_or_default();
    validate_required("Week label", label)?;

    if !request.week_weight.is_finite() || request.week_weight <= 0.0 {
        return Err("Week weight must be greater than 0".to_string());
    }
    if !within_hundred(request.week_weight) {
        return Err(format!(
            "Week weight cannot exceed 100% ({}% requested)",
            request.week_weight
        ));
    }
    if let Some(current) = request.current_total_weight {
        validate_capacity(current, request.week_weight)?;
    }

    if request.aspects.is_empty() {
        return Err("At least one aspect is required".to_string());
    }
    for aspect in &request.aspects {
        validate_required("Aspect name", &aspect.name)?;
        if !aspect.percentage.is_finite() || aspect.percentage <= 0.0 {
            return Err(format!("Aspect '{}' must have a positive percentage", aspect.name));
        }
    }

    let sum = percentages_sum(request.aspects.iter().map(|a| a.percentage));
    if !is_exactly_hundred(sum) {
        return Err(format!("Aspect percentages must total exactly 100% (currently {sum}%)"));
    }

    Ok(label.trim().to_string())
}

/// 新周类型不能使总权重超过 100
pub fn validate_capacity(current_total: f64, week_weight: f64) -> std::result::Result<(), String> {
    if !within_hundred(current_total + week_weight) {
        return Err(format!(
            "Total week weight would exceed 100% ({current_total}% used, {week_weight}% requested)"
        ));
    }
    Ok(())
}

pub struct ParameterWorkflow<'a> {
    client: &'a ApiClient,
    state: ParameterState,
    history: Vec<ParameterState>,
}

impl<'a> ParameterWorkflow<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            state: ParameterState::Editing,
            history: vec![ParameterState::Editing],
        }
    }

    pub fn state(&self) -> &ParameterState {
        &self.state
    }

    pub fn history(&self) -> &[ParameterState] {
        &self.history
    }

    fn transition(&mut self, next: ParameterState) {
        debug!("Parameter workflow: {:?} -> {:?}", self.state, next);
        self.history.push(next.clone());
        self.state = next;
    }

    fn reject(&mut self, message: String) -> MonpadError {
        self.transition(ParameterState::Rejected(message.clone()));
        MonpadError::validation(message)
    }

    fn abort(&mut self, error: MonpadError, orphaned: Vec<i64>) -> MonpadError {
        if !orphaned.is_empty() {
            warn!(
                "Aspect submission aborted, grade types left without a week type: {:?}",
                orphaned
            );
        }
        self.transition(ParameterState::Aborted {
            reason: error.message().to_string(),
            orphaned,
        });
        error
    }

    pub async fn submit(&mut self, request: &AddParameterRequest) -> Result<ParameterOutcome> {
        self.transition(ParameterState::Validating);

        let label = match validate_local(request) {
            Ok(label) => label,
            Err(message) => return Err(self.reject(message)),
        };

        // 请求未带已用权重时，容量校验需要当前已有的周类型
        if request.current_total_weight.is_none() {
            let existing: Vec<WeekTypeDefinition> =
                match self.client.list(Resource::WeekType).await {
                    Ok(existing) => existing,
                    Err(e) => return Err(self.abort(e, Vec::new())),
                };
            if let Err(message) = validate_capacity(total_weight(&existing), request.week_weight)
            {
                return Err(self.reject(message));
            }
        }

        // 依次创建缺少 id 的评分方面，后一步依赖前一步返回的 id
        let mut grade_types = Vec::with_capacity(request.aspects.len());
        let mut created = Vec::new();
        for (index, aspect) in request.aspects.iter().enumerate() {
            if let Some(id) = aspect.id {
                grade_types.push(id);
                continue;
            }

            self.transition(ParameterState::Submitting { index });
            match self.create_aspect(aspect).await {
                Ok(id) => {
                    created.push(id);
                    grade_types.push(id);
                }
                Err(e) => return Err(self.abort(e, created)),
            }
        }

        let payload = CreateWeekTypePayload {
            name: label,
            percentage: request.week_weight,
            grade_types: grade_types.clone(),
        };
        let week_type: WeekTypeDefinition =
            match self.client.create(Resource::WeekType, &payload).await {
                Ok(week_type) => week_type,
                Err(e) => return Err(self.abort(e, created)),
            };

        info!(
            "Week type {} created with {} aspects ({} new)",
            week_type.id,
            grade_types.len(),
            created.len()
        );
        self.transition(ParameterState::Submitted);

        Ok(ParameterOutcome {
            week_type,
            created_aspects: created,
            grade_types,
        })
    }

    async fn create_aspect(&self, aspect: &PendingAspect) -> Result<i64> {
        let payload = CreateGradeTypePayload {
            name: aspect.name.trim().to_string(),
            percentage: aspect.percentage,
        };
        let created: GradeTypeDefinition = self.client.create(Resource::GradeType, &payload).await?;
        Ok(created.id)
    }
}
