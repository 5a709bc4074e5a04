pub mod grading;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::client::{ApiClient, Resource};
use crate::errors::Result;
use crate::models::weeks::entities::WeekRecord;
use crate::models::weeks::requests::{ReviewRequest, WeekGradeInput, WeekQuery};
use crate::services::{request_client, respond};

/// 周记录列表，可按项目筛选
pub async fn list_weeks(client: &ApiClient, project_id: Option<i64>) -> Result<Vec<WeekRecord>> {
    let records: Vec<WeekRecord> = client.list(Resource::Week).await?;
    Ok(records
        .into_iter()
        .filter(|r| project_id.is_none_or(|id| r.project_id == id))
        .collect())
}

pub struct WeekService {
    client: Option<ApiClient>,
}

impl WeekService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> Result<ApiClient> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => request_client(request),
        }
    }

    pub async fn list_weeks(&self, request: &HttpRequest, query: WeekQuery) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => list_weeks(&client, query.project_id).await,
            Err(e) => Err(e),
        };
        respond(result, "Weeks retrieved successfully")
    }

    // 录入周成绩
    pub async fn grade_week(
        &self,
        request: &HttpRequest,
        week_id: i64,
        input: WeekGradeInput,
    ) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => grading::submit_week_grade(&client, week_id, input).await,
            Err(e) => Err(e),
        };
        respond(result, "Week graded successfully")
    }

    // 讲师审阅
    pub async fn review_week(
        &self,
        request: &HttpRequest,
        week_id: i64,
        review: ReviewRequest,
    ) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => review::submit_review(&client, week_id, review).await,
            Err(e) => Err(e),
        };
        respond(result, "Review saved successfully")
    }
}
