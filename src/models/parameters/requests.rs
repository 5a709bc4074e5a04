use serde::{Deserialize, Serialize};

// 待提交的评分方面；已有 id 的直接复用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingAspect {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub percentage: f64,
}

// “添加参数”弹窗提交的内容
#[derive(Debug, Clone, Deserialize)]
pub struct AddParameterRequest {
    #[serde(default)]
    pub week_label: Option<String>,
    pub week_weight: f64,
    pub aspects: Vec<PendingAspect>,
    /// 弹窗打开时页面上显示的已用权重；缺省时提交前向上游重新获取
    #[serde(default)]
    pub current_total_weight: Option<f64>,
}

// 发送给上游的评分方面
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateGradeTypePayload {
    pub name: String,
    pub percentage: f64,
}

// 发送给上游的周类型
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateWeekTypePayload {
    pub name: String,
    pub percentage: f64,
    pub grade_types: Vec<i64>,
}
