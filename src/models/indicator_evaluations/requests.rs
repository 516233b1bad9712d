use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct EvaluateIndicatorRequest {
    pub achieved: bool,
    pub score: Option<f64>,
    pub comment: Option<String>,
}

// 评价写入参数（用于存储层）
#[derive(Debug, Clone)]
pub struct UpsertIndicatorEvaluation {
    pub indicator_id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub achieved: bool,
    pub score: Option<f64>,
    pub comment: Option<String>,
}
