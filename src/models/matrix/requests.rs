use serde::Deserialize;

// 成绩矩阵查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatrixQuery {
    /// 只显示该项目下的小组
    #[serde(default)]
    pub project_id: Option<i64>,
}

// 导出参数，format 为 xlsx（默认）或 csv
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatrixExportQuery {
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub format: Option<String>,
}
