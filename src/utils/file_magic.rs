/// 验证表格文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（包含点号，如 ".xlsx"）
///
/// # Returns
/// * `true` - 魔术字节匹配或该类型不需要验证
/// * `false` - 魔术字节不匹配
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        // Excel 旧格式 (OLE Compound Document)
        ".xls" => data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
        // Excel 新格式 (ZIP-based OOXML)
        ".xlsx" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        // 文本格式 - 不检查魔术字节
        ".csv" => true,
        // 未知格式 - 默认拒绝
        _ => false,
    }
}

/// 提取文件扩展名（含点号，小写）
pub fn file_extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlsx_magic() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip_header, ".xlsx"));
        assert!(validate_magic_bytes(&zip_header, ".XLSX"));
        assert!(!validate_magic_bytes(&zip_header, ".xls"));
    }

    #[test]
    fn test_xls_magic() {
        let ole_header = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        assert!(validate_magic_bytes(&ole_header, ".xls"));
        assert!(!validate_magic_bytes(&ole_header, ".xlsx"));
    }

    #[test]
    fn test_csv_and_unknown() {
        assert!(validate_magic_bytes(b"nim,name", ".csv"));
        assert!(!validate_magic_bytes(b"MZ", ".exe"));
        assert!(!validate_magic_bytes(&[], ".csv"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("mahasiswa.XLSX").as_deref(), Some(".xlsx"));
        assert_eq!(file_extension("data.csv").as_deref(), Some(".csv"));
        assert!(file_extension("README").is_none());
    }
}
