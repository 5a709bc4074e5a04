//! 学生批量导入
//!
//! 文件在本地只做早期检查（非空、扩展名、魔术字节），行级校验交给上游。
//! 上游 422 返回的行级错误最多展示 `import.error_preview_limit` 条。

use actix_multipart::Multipart;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::info;

use crate::client::{ApiClient, ApiRequest, CallOptions, Method, UploadFile, envelope};
use crate::config::ImportConfig;
use crate::errors::Result;
use crate::models::students::responses::ImportResult;
use crate::services::matrix::export::XLSX_CONTENT_TYPE;
use crate::utils::{file_extension, validate_magic_bytes};

pub const IMPORT_PATH: &str = "/excel/mahasiswa/import";
const FILE_FIELD: &str = "file";

fn mime_for(extension: &str) -> &'static str {
    match extension {
        ".xlsx" => XLSX_CONTENT_TYPE,
        ".xls" => "application/vnd.ms-excel",
        _ => "text/csv",
    }
}

pub(crate) async fn read_file_from_multipart(
    payload: &mut Multipart,
    max_size: usize,
) -> std::result::Result<(Vec<u8>, String), String> {
    let mut file_bytes = Vec::new();
    let mut file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Failed to read form field: {e}"))?;

        if field.name().map(|n| n == FILE_FIELD).unwrap_or(false) {
            // 获取文件名
            if let Some(content_disposition) = field.content_disposition() {
                file_name = content_disposition
                    .get_filename()
                    .unwrap_or("upload.csv")
                    .to_string();
            }

            // 读取内容
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("Failed to read file data: {e}"))?;
                if file_bytes.len() + data.len() > max_size {
                    return Err(format!("File exceeds the {max_size} byte limit"));
                }
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_bytes.is_empty() {
        return Err("No file was uploaded".to_string());
    }

    Ok((file_bytes, file_name))
}

/// 本地早期检查，返回小写扩展名
pub fn validate_upload(
    bytes: &[u8],
    file_name: &str,
    config: &ImportConfig,
) -> std::result::Result<String, String> {
    if bytes.is_empty() {
        return Err("The uploaded file is empty".to_string());
    }
    if bytes.len() > config.max_size {
        return Err(format!("File exceeds the {} byte limit", config.max_size));
    }

    let extension = file_extension(file_name)
        .filter(|ext| config.allowed_types.iter().any(|t| t.eq_ignore_ascii_case(ext)))
        .ok_or_else(|| {
            format!(
                "Unsupported file type. Allowed types: {}",
                config.allowed_types.join(", ")
            )
        })?;

    if !validate_magic_bytes(bytes, &extension) {
        return Err(format!("File content does not match the {extension} extension"));
    }
    Ok(extension)
}

pub async fn import_students(
    client: &ApiClient,
    file_name: &str,
    bytes: Vec<u8>,
    extension: &str,
    error_preview_limit: usize,
) -> Result<ImportResult> {
    let request = ApiRequest::new(Method::Post, IMPORT_PATH).multipart(UploadFile {
        field: FILE_FIELD.to_string(),
        file_name: file_name.to_string(),
        mime: mime_for(extension).to_string(),
        bytes,
    });
    let options = CallOptions {
        message_limit: error_preview_limit,
        ..Default::default()
    };

    let response = client.execute(request, options).await?;
    let raw = envelope::parse_body(&response.body)?;
    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Students imported successfully")
        .to_string();
    let detail = match envelope::unwrap_envelope(raw) {
        Value::Null => None,
        Value::Object(map) if map.len() == 1 && map.contains_key("message") => None,
        other => Some(other),
    };

    info!("Imported students from {}", file_name);
    Ok(ImportResult {
        file_name: file_name.to_string(),
        message,
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RequestBody;
    use crate::client::mock::MockTransport;
    use crate::errors::MonpadError;
    use crate::session::MemorySession;
    use serde_json::json;
    use std::sync::Arc;

    fn config() -> ImportConfig {
        ImportConfig {
            max_size: 1024,
            error_preview_limit: 5,
            allowed_types: vec![".xlsx".into(), ".xls".into(), ".csv".into()],
        }
    }

    #[test]
    fn test_upload_checks() {
        let xlsx = [0x50, 0x4B, 0x03, 0x04, 0x14];
        assert_eq!(validate_upload(&xlsx, "mahasiswa.XLSX", &config()).unwrap(), ".xlsx");
        assert!(validate_upload(&[], "mahasiswa.xlsx", &config()).is_err());
        assert!(validate_upload(b"nim,nama", "mahasiswa.txt", &config()).is_err());
        assert!(validate_upload(b"nim,nama", "mahasiswa.xlsx", &config()).is_err());
        assert!(validate_upload(&[0u8; 2048], "mahasiswa.csv", &config()).is_err());
        assert_eq!(validate_upload(b"nim,nama", "mahasiswa.csv", &config()).unwrap(), ".csv");
    }

    #[tokio::test]
    async fn test_import_sends_multipart_file_field() {
        let mock = Arc::new(MockTransport::new());
        mock.on(
            Method::Post,
            IMPORT_PATH,
            200,
            json!({"message": "12 students imported", "data": {"imported": 12}}),
        );
        let client = ApiClient::new(mock.clone(), Arc::new(MemorySession::with_token("t")));

        let result = import_students(&client, "kelas.csv", b"nim,nama\n1,Ani".to_vec(), ".csv", 5)
            .await
            .unwrap();
        assert_eq!(result.message, "12 students imported");
        assert_eq!(result.detail, Some(json!({"imported": 12})));

        let RequestBody::Multipart(file) = &mock.requests()[0].body else {
            panic!("import should upload multipart");
        };
        assert_eq!(file.field, "file");
        assert_eq!(file.mime, "text/csv");
    }

    #[tokio::test]
    async fn test_row_errors_truncated_to_preview_limit() {
        let mock = Arc::new(MockTransport::new());
        let errors: Vec<String> = (1..=9).map(|i| format!("Row {i}: NIM already exists")).collect();
        mock.on(Method::Post, IMPORT_PATH, 422, json!({"errors": errors}));
        let client = ApiClient::new(mock, Arc::new(MemorySession::with_token("t")));

        let err = import_students(&client, "kelas.csv", b"x".to_vec(), ".csv", 5)
            .await
            .unwrap_err();
        let MonpadError::Validation(message) = err else {
            panic!("expected validation error");
        };
        assert_eq!(message.lines().count(), 6);
        assert!(message.ends_with("... and 4 more"));
    }
}
