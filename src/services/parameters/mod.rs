pub mod workflow;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::client::{ApiClient, Resource};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::parameters::requests::AddParameterRequest;
use crate::models::parameters::responses::ParameterOverview;
use crate::models::weeks::entities::{GradeTypeDefinition, WeekTypeDefinition};
use crate::services::{request_client, respond, weights};

use workflow::ParameterWorkflow;

pub async fn load_overview(client: &ApiClient) -> Result<ParameterOverview> {
    let (week_types, grade_types) = tokio::try_join!(
        client.list::<WeekTypeDefinition>(Resource::WeekType),
        client.list::<GradeTypeDefinition>(Resource::GradeType),
    )?;
    let total_weight = weights::total_weight(&week_types);
    Ok(ParameterOverview {
        total_weight,
        remaining_weight: (100.0 - total_weight).max(0.0),
        week_types,
        grade_types,
    })
}

pub struct ParameterService {
    client: Option<ApiClient>,
}

impl ParameterService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> Result<ApiClient> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => request_client(request),
        }
    }

    // 参数概览
    pub async fn get_overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => load_overview(&client).await,
            Err(e) => Err(e),
        };
        respond(result, "Parameters retrieved successfully")
    }

    // 添加周类型及其评分方面
    pub async fn add_parameter(
        &self,
        request: &HttpRequest,
        body: AddParameterRequest,
    ) -> ActixResult<HttpResponse> {
        let client = match self.get_client(request) {
            Ok(client) => client,
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        };

        let mut workflow = ParameterWorkflow::new(&client);
        match workflow.submit(&body).await {
            Ok(outcome) => {
                info!("Parameter '{}' added", outcome.week_type.name);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    outcome,
                    "Parameter created successfully",
                )))
            }
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }
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
    async fn test_overview_remaining_weight() {
        let mock = Arc::new(MockTransport::new());
        mock.on(
            Method::Get,
            "/week-type",
            200,
            json!([{"id": 1, "name": "Minggu 1", "percentage": 40}, {"id": 2, "name": "Minggu 2", "percentage": 35}]),
        );
        mock.on(Method::Get, "/grade-type", 200, json!({"data": null}));
        let client = ApiClient::new(mock, Arc::new(MemorySession::with_token("t")));

        let overview = load_overview(&client).await.unwrap();
        assert_eq!(overview.total_weight, 75.0);
        assert_eq!(overview.remaining_weight, 25.0);
        assert!(overview.grade_types.is_empty());
    }
}
