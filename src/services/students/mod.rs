pub mod import;
pub mod template;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::request_client;

pub struct StudentService {
    client: Option<ApiClient>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> Result<ApiClient> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => request_client(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 下载导入模板
    pub async fn download_template(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => template::download_template(&client).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(file) => Ok(HttpResponse::Ok()
                .content_type(file.content_type)
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", template::TEMPLATE_FILE_NAME),
                ))
                .body(file.bytes)),
            Err(e) => {
                error!("Failed to download import template: {}", e);
                Ok(ApiResponse::from_error(&e))
            }
        }
    }

    // 批量导入学生
    pub async fn import_students(
        &self,
        mut payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let config = &self.get_config().import;

        let (bytes, file_name) =
            match import::read_file_from_multipart(&mut payload, config.max_size).await {
                Ok(result) => result,
                Err(e) => {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::ImportFileInvalid,
                        e,
                    )));
                }
            };

        let extension = match import::validate_upload(&bytes, &file_name, config) {
            Ok(extension) => extension,
            Err(e) => {
                warn!("Rejected import file {}: {}", file_name, e);
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ImportFileInvalid,
                    e,
                )));
            }
        };

        let client = match self.get_client(request) {
            Ok(client) => client,
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        };

        match import::import_students(
            &client,
            &file_name,
            bytes,
            &extension,
            config.error_preview_limit,
        )
        .await
        {
            Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                result,
                "Import completed",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }
}
