use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 录入成绩请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRequest {
    pub student_id: i64,
    pub subject: String,
    pub phase: i32,
    pub score: f64,
    pub weight: Option<f64>,
    pub description: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    pub score: Option<f64>,
    pub weight: Option<f64>,
    pub description: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub subject: Option<String>,
    pub phase: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeExportParams {
    pub phase: i32,
    pub subject: Option<String>,
    pub grade_level: Option<i32>,
}

// 成绩写入参数（用于存储层）
#[derive(Debug, Clone)]
pub struct NewGrade {
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub phase: i32,
    pub score: f64,
    pub weight: f64,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub questionnaire_id: Option<i64>,
}

// 成绩列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct GradeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub subject: Option<String>,
    pub phase: Option<i32>,
}

// 阶段成绩筛选条件（用于评估与导出）
#[derive(Debug, Clone, Default)]
pub struct PhaseGradeQuery {
    pub phase: i32,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub subject: Option<String>,
    pub grade_level: Option<i32>,
}
