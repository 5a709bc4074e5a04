use indexmap::IndexMap;
use serde::Serialize;

// 成绩矩阵的列描述，每个周类型一列
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    pub week_id: i64,
    pub percentage: f64,
}

// 成绩矩阵的一行，每个小组一行
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatrixRow {
    pub id: i64,
    pub kelompok_id: String,
    pub nama_proyek: String,
    pub project_id: i64,
    #[serde(flatten)]
    pub week_grades: IndexMap<String, f64>,
    pub total_skor: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatrixView {
    pub total_weight: f64,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<MatrixRow>,
}
