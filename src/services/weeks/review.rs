//! 讲师对周记录的审阅意见

use serde_json::Value;
use tracing::info;

use crate::client::{ApiClient, Resource};
use crate::errors::{MonpadError, Result};
use crate::models::weeks::requests::ReviewRequest;
use crate::utils::validate::validate_required;

pub fn review_path(week_id: i64) -> String {
    format!("{}/review", Resource::Week.item_path(week_id))
}

pub async fn submit_review(client: &ApiClient, week_id: i64, review: ReviewRequest) -> Result<Value> {
    validate_required("Review", &review.review).map_err(MonpadError::validation)?;

    let body = ReviewRequest {
        review: review.review.trim().to_string(),
    };
    let saved: Value = client.post(&review_path(week_id), &body).await?;
    info!("Review attached to week {}", week_id);
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::client::mock::MockTransport;
    use crate::session::MemorySession;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_review_posts_to_sub_resource() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Post, "/week/4/review", 201, json!({"data": {"id": 1, "review": "Bagus"}}));
        let client = ApiClient::new(mock.clone(), Arc::new(MemorySession::with_token("t")));

        let saved = submit_review(&client, 4, ReviewRequest { review: " Bagus ".into() })
            .await
            .unwrap();
        assert_eq!(saved["review"], "Bagus");
        assert_eq!(mock.count(Method::Post, "/week/4/review"), 1);
    }

    #[tokio::test]
    async fn test_blank_review_rejected_locally() {
        let mock = Arc::new(MockTransport::new());
        let client = ApiClient::new(mock.clone(), Arc::new(MemorySession::with_token("t")));

        let err = submit_review(&client, 4, ReviewRequest { review: "   ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, MonpadError::Validation(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_week_is_not_found() {
        let mock = Arc::new(MockTransport::new());
        let client = ApiClient::new(mock, Arc::new(MemorySession::with_token("t")));

        let err = submit_review(&client, 99, ReviewRequest { review: "ok".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, MonpadError::NotFound(_)));
    }
}
