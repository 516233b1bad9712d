use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::indicators::entities::Indicator;

// 指标评价：每个 (指标, 学生) 至多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct IndicatorEvaluation {
    pub id: i64,
    pub indicator_id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub achieved: bool,
    pub score: Option<f64>,
    pub comment: Option<String>,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 指标及其评价（若有）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct IndicatorWithEvaluation {
    pub indicator: Indicator,
    pub evaluation: Option<IndicatorEvaluation>,
}
