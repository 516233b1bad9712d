use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 创建指标请求：student_id 与 grade_level 二选一
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct CreateIndicatorRequest {
    pub subject: String,
    pub phase: i32,
    pub description: String,
    pub category: Option<String>,
    pub grade_level: Option<i32>,
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct UpdateIndicatorRequest {
    pub subject: Option<String>,
    pub phase: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct IndicatorListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub subject: Option<String>,
    pub phase: Option<i32>,
    pub grade_level: Option<i32>,
    pub student_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct PhaseFilterParams {
    pub phase: Option<i32>,
}

// 指标列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct IndicatorListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub subject: Option<String>,
    pub phase: Option<i32>,
    pub grade_level: Option<i32>,
    pub student_id: Option<i64>,
}

// 适用于某个学生的指标筛选条件（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ApplicableIndicatorQuery {
    pub teacher_id: Option<i64>,
    pub subject: Option<String>,
    pub phase: Option<i32>,
}
