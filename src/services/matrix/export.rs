//! 成绩矩阵导出

use rust_xlsxwriter::{Format, Workbook};

use crate::errors::{MonpadError, Result};
use crate::models::matrix::responses::MatrixView;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => XLSX_CONTENT_TYPE,
            ExportFormat::Csv => CSV_CONTENT_TYPE,
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = MonpadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(MonpadError::bad_request(format!(
                "Unsupported export format: '{other}'. Supported formats: xlsx, csv"
            ))),
        }
    }
}

/// 表头：小组、项目、各周（标签中的换行改为空格）、总分
fn header(view: &MatrixView) -> Vec<String> {
    let mut header = vec!["Kelompok".to_string(), "Nama Proyek".to_string()];
    header.extend(view.columns.iter().map(|c| c.label.replace('\n', " ")));
    header.push("Total Skor".to_string());
    header
}

pub fn export(view: &MatrixView, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Xlsx => export_xlsx(view),
        ExportFormat::Csv => export_csv(view),
    }
}

pub fn export_csv(view: &MatrixView) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header(view))?;

    for row in &view.rows {
        let mut record = vec![row.kelompok_id.clone(), row.nama_proyek.clone()];
        record.extend(
            view.columns
                .iter()
                .map(|c| row.week_grades.get(&c.key).copied().unwrap_or(0.0).to_string()),
        );
        record.push(row.total_skor.clone());
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| MonpadError::file_operation(format!("Failed to flush CSV: {e}")))
}

pub fn export_xlsx(view: &MatrixView) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let number_format = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet().set_name("Rekap Nilai")?;

    for (col, title) in header(view).iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title, &header_format)?;
    }

    for (i, row) in view.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &row.kelompok_id)?;
        sheet.write_string(r, 1, &row.nama_proyek)?;
        for (j, column) in view.columns.iter().enumerate() {
            let grade = row.week_grades.get(&column.key).copied().unwrap_or(0.0);
            sheet.write_number_with_format(r, (j + 2) as u16, grade, &number_format)?;
        }
        let total: f64 = row.total_skor.parse().unwrap_or(0.0);
        sheet.write_number_with_format(
            r,
            (view.columns.len() + 2) as u16,
            total,
            &number_format,
        )?;
    }

    sheet.set_column_width(0, 18)?;
    sheet.set_column_width(1, 28)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matrix::responses::{ColumnDescriptor, MatrixRow};
    use indexmap::IndexMap;

    fn view() -> MatrixView {
        let columns = vec![
            ColumnDescriptor {
                key: "week_1".into(),
                label: "Minggu 1\n40%".into(),
                week_id: 1,
                percentage: 40.0,
            },
            ColumnDescriptor {
                key: "week_2".into(),
                label: "Minggu 2\n30%".into(),
                week_id: 2,
                percentage: 30.0,
            },
        ];
        let mut week_grades = IndexMap::new();
        week_grades.insert("week_1".to_string(), 80.0);
        week_grades.insert("week_2".to_string(), 50.0);
        MatrixView {
            total_weight: 70.0,
            columns,
            rows: vec![MatrixRow {
                id: 3,
                kelompok_id: "Kelompok A".into(),
                nama_proyek: "SIAKAD, versi 2".into(),
                project_id: 7,
                week_grades,
                total_skor: "47.00".into(),
            }],
        }
    }

    #[test]
    fn test_csv_layout() {
        let bytes = export_csv(&view()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Kelompok,Nama Proyek,Minggu 1 40%,Minggu 2 30%,Total Skor"
        );
        assert_eq!(lines.next().unwrap(), "Kelompok A,\"SIAKAD, versi 2\",80,50,47.00");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_xlsx_is_zip() {
        let bytes = export_xlsx(&view()).unwrap();
        assert!(bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
