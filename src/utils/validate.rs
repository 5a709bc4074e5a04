/// 百分比之和的比较容差，避免 33.3 + 33.3 + 33.4 之类的浮点误差
pub const PERCENT_EPSILON: f64 = 1e-6;

pub fn percentages_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0, |acc, x| acc + x)
}

/// 百分比之和是否恰好为 100
pub fn is_exactly_hundred(total: f64) -> bool {
    (total - 100.0).abs() <= PERCENT_EPSILON
}

/// 总和是否不超过 100
pub fn within_hundred(total: f64) -> bool {
    total <= 100.0 + PERCENT_EPSILON
}

/// 单项分数必须在 0..=100 之间
pub fn validate_score(label: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(format!("{label} must be between 0 and 100"));
    }
    Ok(())
}

pub fn validate_required(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(())
}
