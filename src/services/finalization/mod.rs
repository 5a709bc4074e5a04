pub mod roster;
pub mod toggle;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::client::ApiClient;
use crate::errors::{MonpadError, Result};
use crate::models::finalization::requests::ToggleFinalizationRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{request_client, respond};

pub struct FinalizationService {
    client: Option<ApiClient>,
}

impl FinalizationService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> Result<ApiClient> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => request_client(request),
        }
    }

    // 定稿名单
    pub async fn get_roster(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => roster::load_roster(&client).await,
            Err(e) => Err(e),
        };
        respond(result, "Finalization roster retrieved successfully")
    }

    // 切换定稿状态，返回刷新后的名单
    pub async fn toggle(
        &self,
        request: &HttpRequest,
        body: ToggleFinalizationRequest,
    ) -> ActixResult<HttpResponse> {
        let client = match self.get_client(request) {
            Ok(client) => client,
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        };

        match toggle::toggle_finalization(&client, &body).await {
            Ok(roster) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                roster,
                "Finalization status updated",
            ))),
            Err(MonpadError::Validation(message)) if body.finalization_id.is_none() => {
                Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                    ErrorCode::FinalizationMissing,
                    message,
                )))
            }
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }
}
