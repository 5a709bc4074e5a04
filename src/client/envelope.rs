//! 上游响应信封处理与失败分类

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{MonpadError, Result};

/// 成功响应一般包裹在 `{data: ...}` 中，缺失时退回原始负载
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// 解析响应体，空响应体视为 `null`
pub fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| {
        MonpadError::response_shape(format!("Response body is not valid JSON: {e}"))
    })
}

pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let value = unwrap_envelope(parse_body(body)?);
    serde_json::from_value(value)
        .map_err(|e| MonpadError::response_shape(format!("Unexpected response payload: {e}")))
}

/// 按顺序收集 422 响应中的所有提示信息
///
/// 支持 `{errors: {field: [msg, ...]}}`、`{errors: [msg, ...]}` 和 `{message}`。
pub fn validation_messages(value: &Value) -> Vec<String> {
    let mut messages = Vec::new();

    match value.get("errors") {
        Some(Value::Object(fields)) => {
            for field_messages in fields.values() {
                collect_strings(field_messages, &mut messages);
            }
        }
        Some(other) => collect_strings(other, &mut messages),
        None => {}
    }

    if messages.is_empty() {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            messages.push(message.to_string());
        }
    }

    messages
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get("message") {
                out.push(s.clone());
            }
        }
        _ => {}
    }
}

/// 截取前 `limit` 条提示，剩余条数以摘要形式追加
pub fn summarize_messages(messages: &[String], limit: usize) -> String {
    let limit = limit.max(1);
    let mut summary = messages
        .iter()
        .take(limit)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    if messages.len() > limit {
        summary.push_str(&format!("\n... and {} more", messages.len() - limit));
    }
    summary
}

/// 将非 2xx 响应转换为错误
///
/// `message_limit` 为 1 时只保留第一条校验信息，批量导入时放宽。
pub fn classify_failure(status: u16, body: &[u8], message_limit: usize) -> MonpadError {
    let value = parse_body(body).unwrap_or(Value::Null);
    let messages = validation_messages(&value);
    let first = messages.first().cloned();

    match status {
        401 => MonpadError::unauthorized(first.unwrap_or_else(|| "Unauthenticated".into())),
        403 => MonpadError::forbidden(
            first.unwrap_or_else(|| "You do not have access to this resource".into()),
        ),
        404 => MonpadError::not_found(first.unwrap_or_else(|| "resource missing".into())),
        405 => MonpadError::not_permitted(
            first.unwrap_or_else(|| "method not allowed for this resource".into()),
        ),
        422 => {
            match first {
                None => MonpadError::validation("The submitted data is invalid"),
                Some(first) if message_limit <= 1 => MonpadError::validation(first),
                Some(_) => MonpadError::validation(summarize_messages(&messages, message_limit)),
            }
        }
        500..=599 => {
            MonpadError::upstream(first.unwrap_or_else(|| format!("HTTP {status}")))
        }
        _ => MonpadError::bad_request(first.unwrap_or_else(|| format!("HTTP {status}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_prefers_data() {
        assert_eq!(unwrap_envelope(json!({"data": [1, 2]})), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!({"id": 1})), json!({"id": 1}));
    }

    #[test]
    fn test_decode_empty_body_as_null() {
        let value: Option<i64> = decode(b"").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_first_field_message_is_surfaced() {
        let body = json!({
            "message": "The given data was invalid.",
            "errors": {
                "name": ["The name field is required."],
                "percentage": ["The percentage must be a number."]
            }
        })
        .to_string();
        let err = classify_failure(422, body.as_bytes(), 1);
        assert_eq!(err, MonpadError::validation("The name field is required."));
    }

    #[test]
    fn test_message_fallback_without_errors() {
        let body = json!({"message": "Week already finalized"}).to_string();
        let err = classify_failure(422, body.as_bytes(), 1);
        assert_eq!(err.message(), "Week already finalized");
    }

    #[test]
    fn test_bulk_messages_truncated_to_limit() {
        let rows: Vec<String> = (1..=8).map(|i| format!("Row {i}: nim is required")).collect();
        let body = json!({"errors": rows}).to_string();
        let err = classify_failure(422, body.as_bytes(), 5);
        let text = err.message();
        assert!(text.contains("Row 5"));
        assert!(!text.contains("Row 6"));
        assert!(text.ends_with("... and 3 more"));
    }

    #[test]
    fn test_status_taxonomy() {
        assert!(matches!(classify_failure(401, b"", 1), MonpadError::Unauthorized(_)));
        assert!(matches!(classify_failure(404, b"", 1), MonpadError::NotFound(_)));
        assert!(matches!(classify_failure(405, b"", 1), MonpadError::NotPermitted(_)));
        assert!(matches!(classify_failure(503, b"<html>", 1), MonpadError::Upstream(_)));
        assert!(matches!(classify_failure(409, b"{}", 1), MonpadError::BadRequest(_)));
    }
}
