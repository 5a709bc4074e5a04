pub mod assemble;
pub mod export;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{debug, error, info};

use crate::client::{ApiClient, Resource};
use crate::errors::{MonpadError, Result};
use crate::models::ApiResponse;
use crate::models::groups::entities::Group;
use crate::models::matrix::requests::{MatrixExportQuery, MatrixQuery};
use crate::models::matrix::responses::MatrixView;
use crate::models::projects::entities::Project;
use crate::models::weeks::entities::{WeekRecord, WeekTypeDefinition};
use crate::services::{request_client, respond, weights};
use crate::session::token_fingerprint;
use crate::utils::RequestCoalescer;

use export::ExportFormat;

/// 组装矩阵所需的四个集合
#[derive(Debug, Clone)]
pub struct MatrixInputs {
    pub week_types: Vec<WeekTypeDefinition>,
    pub week_records: Vec<WeekRecord>,
    pub groups: Vec<Group>,
    pub projects: Vec<Project>,
}

/// 固定扇出：四个互不依赖的 GET 并发执行，任一失败即整体失败
pub async fn fetch_inputs(client: &ApiClient) -> Result<MatrixInputs> {
    let (week_types, week_records, groups, projects) = tokio::try_join!(
        client.list::<WeekTypeDefinition>(Resource::WeekType),
        client.list::<WeekRecord>(Resource::Week),
        client.list::<Group>(Resource::Group),
        client.list::<Project>(Resource::Project),
    )?;
    Ok(MatrixInputs {
        week_types,
        week_records,
        groups,
        projects,
    })
}

pub fn build_matrix(inputs: &MatrixInputs, project_id: Option<i64>) -> MatrixView {
    let columns = weights::build_columns(&inputs.week_types);
    let groups: Vec<Group> = inputs
        .groups
        .iter()
        .filter(|g| project_id.is_none_or(|id| g.project_id == id))
        .cloned()
        .collect();
    let rows = assemble::assemble_rows(&groups, &inputs.projects, &inputs.week_records, &columns);

    MatrixView {
        total_weight: weights::total_weight(&inputs.week_types),
        columns,
        rows,
    }
}

/// 合并键：`matrix:{令牌摘要}:{项目 id}`，不包含原始令牌
pub(crate) fn coalesce_key(client: &ApiClient, project_id: Option<i64>) -> String {
    let session = client
        .session()
        .get_token()
        .map(|token| token_fingerprint(&token))
        .unwrap_or_default();
    format!(
        "matrix:{session}:{}",
        project_id.map(|id| id.to_string()).unwrap_or_default()
    )
}

pub struct MatrixService {
    client: Option<ApiClient>,
    coalescer: RequestCoalescer<MatrixView>,
}

impl MatrixService {
    pub fn new_lazy() -> Self {
        Self {
            client: None,
            coalescer: RequestCoalescer::new(),
        }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> Result<ApiClient> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => request_client(request),
        }
    }

    /// 获取并组装矩阵；同一会话、同一筛选条件的重叠请求合并为一次取数
    pub async fn load_matrix(&self, client: &ApiClient, project_id: Option<i64>) -> Result<MatrixView> {
        let key = coalesce_key(client, project_id);

        let fetch_client = client.clone();
        let result = self
            .coalescer
            .run(&key, async move {
                let inputs = fetch_inputs(&fetch_client).await?;
                debug!(
                    "Matrix inputs: {} week types, {} week records, {} groups, {} projects",
                    inputs.week_types.len(),
                    inputs.week_records.len(),
                    inputs.groups.len(),
                    inputs.projects.len()
                );
                Ok(build_matrix(&inputs, project_id))
            })
            .await;

        // 合并进来的调用者没有发出请求，需要自己触发本会话的 401 回调
        if let Err(MonpadError::Unauthorized(_)) = &result
            && client.session().get_token().is_some()
        {
            client.session().notify_unauthorized();
        }
        result
    }

    pub async fn get_matrix(
        &self,
        request: &HttpRequest,
        query: MatrixQuery,
    ) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => self.load_matrix(&client, query.project_id).await,
            Err(e) => Err(e),
        };
        respond(result, "Grade matrix assembled successfully")
    }

    pub async fn export_matrix(
        &self,
        request: &HttpRequest,
        query: MatrixExportQuery,
    ) -> ActixResult<HttpResponse> {
        let result = async {
            let format: ExportFormat = query.format.as_deref().unwrap_or("xlsx").parse()?;
            let client = self.get_client(request)?;
            let view = self.load_matrix(&client, query.project_id).await?;
            let bytes = export::export(&view, format)?;
            Ok::<_, MonpadError>((format, bytes))
        }
        .await;

        match result {
            Ok((format, bytes)) => {
                let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
                let filename = format!("rekap_nilai_{timestamp}.{}", format.extension());
                info!("Exported grade matrix as {}", filename);

                Ok(HttpResponse::Ok()
                    .content_type(format.content_type())
                    .insert_header((
                        "Content-Disposition",
                        format!("attachment; filename=\"{filename}\""),
                    ))
                    .body(bytes))
            }
            Err(e) => {
                error!("Failed to export grade matrix: {}", e);
                Ok(ApiResponse::from_error(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::client::mock::MockTransport;
    use crate::session::{MemorySession, SessionStore};
    use serde_json::json;
    use std::sync::Arc;

    fn scripted() -> Arc<MockTransport> {
        let mock = Arc::new(MockTransport::new());
        mock.on(
            Method::Get,
            "/week-type",
            200,
            json!({"data": [
                {"id": 1, "name": "Minggu 1", "percentage": 40},
                {"id": 2, "name": "Minggu 2", "percentage": "30"}
            ]}),
        );
        mock.on(
            Method::Get,
            "/week",
            200,
            json!({"data": [
                {"id": 21, "project_id": 7, "week_type": {"id": 2, "name": "Minggu 2", "percentage": 30}, "total_grade": "50"},
                {"id": 20, "project_id": 7, "week_type": {"id": 1, "name": "Minggu 1", "percentage": 40}, "total_grade": 80}
            ]}),
        );
        mock.on(
            Method::Get,
            "/group",
            200,
            json!([
                {"id": 3, "name": "Kelompok A", "project_id": 7},
                {"id": 4, "name": "Kelompok B", "project_id": 8}
            ]),
        );
        mock.on(Method::Get, "/project", 200, json!({"data": [{"id": 7, "name": "SIAKAD"}]}));
        mock
    }

    #[tokio::test]
    async fn test_load_matrix_end_to_end() {
        let mock = scripted();
        let client = ApiClient::new(mock.clone(), Arc::new(MemorySession::with_token("t")));
        let service = MatrixService::new_lazy();

        let view = service.load_matrix(&client, None).await.unwrap();
        assert_eq!(view.total_weight, 70.0);
        assert_eq!(view.columns.len(), 2);
        assert_eq!(view.rows[0].total_skor, "47.00");
        assert_eq!(view.rows[1].nama_proyek, "-");
        assert_eq!(mock.count_method(Method::Get), 4);
        assert!(!service.coalescer.is_in_flight(&coalesce_key(&client, None)));
    }

    #[test]
    fn test_coalesce_key_does_not_carry_token() {
        let client = ApiClient::new(
            Arc::new(MockTransport::new()),
            Arc::new(MemorySession::with_token("SECRET-BEARER-abc123")),
        );
        let key = coalesce_key(&client, Some(7));
        assert!(!key.contains("SECRET-BEARER-abc123"));
        assert!(key.starts_with("matrix:"));
        assert!(key.ends_with(":7"));

        let other = ApiClient::new(
            Arc::new(MockTransport::new()),
            Arc::new(MemorySession::with_token("another-token")),
        );
        assert_ne!(key, coalesce_key(&other, Some(7)));
    }

    #[tokio::test]
    async fn test_project_filter() {
        let mock = scripted();
        let client = ApiClient::new(mock, Arc::new(MemorySession::with_token("t")));
        let service = MatrixService::new_lazy();

        let view = service.load_matrix(&client, Some(8)).await.unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].kelompok_id, "Kelompok B");
    }

    #[tokio::test]
    async fn test_one_failed_fetch_fails_the_matrix() {
        let mock = scripted();
        mock.on(Method::Get, "/group", 500, json!({"message": "Server Error"}));
        let client = ApiClient::new(mock, Arc::new(MemorySession::with_token("t")));
        let service = MatrixService::new_lazy();

        let err = service.load_matrix(&client, None).await.unwrap_err();
        assert!(matches!(err, MonpadError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_fires_session_callback() {
        let mock = scripted();
        mock.on(Method::Get, "/week", 401, json!({"message": "Unauthenticated."}));
        let session = Arc::new(MemorySession::with_token("t"));
        let client = ApiClient::new(mock, session.clone());
        let service = MatrixService::new_lazy();

        let err = service.load_matrix(&client, None).await.unwrap_err();
        assert!(matches!(err, MonpadError::Unauthorized(_)));
        assert!(session.get_token().is_none());
    }
}
