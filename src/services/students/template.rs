//! 学生导入模板下载，原样转发上游文件

use crate::client::{ApiClient, ApiRequest, CallOptions, Method};
use crate::errors::{MonpadError, Result};
use crate::services::matrix::export::XLSX_CONTENT_TYPE;

pub const TEMPLATE_PATH: &str = "/excel/mahasiswa/template";
pub const TEMPLATE_FILE_NAME: &str = "template_mahasiswa.xlsx";

#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub async fn download_template(client: &ApiClient) -> Result<TemplateFile> {
    let response = client
        .execute(ApiRequest::new(Method::Get, TEMPLATE_PATH), CallOptions::default())
        .await?;
    if response.body.is_empty() {
        return Err(MonpadError::response_shape("Template download returned an empty file"));
    }

    Ok(TemplateFile {
        content_type: response
            .content_type
            .unwrap_or_else(|| XLSX_CONTENT_TYPE.to_string()),
        bytes: response.body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::session::MemorySession;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_template_bytes_pass_through() {
        let mock = Arc::new(MockTransport::new());
        let bytes = vec![0x50, 0x4B, 0x03, 0x04, 0x00];
        mock.on_bytes(Method::Get, TEMPLATE_PATH, XLSX_CONTENT_TYPE, bytes.clone());
        let client = ApiClient::new(mock.clone(), Arc::new(MemorySession::with_token("t")));

        let file = download_template(&client).await.unwrap();
        assert_eq!(file.bytes, bytes);
        assert_eq!(file.content_type, XLSX_CONTENT_TYPE);
        assert_eq!(mock.requests()[0].bearer.as_deref(), Some("t"));
    }
}
