use super::entities::{Question, Questionnaire, QuestionnaireResponse};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 问卷详情（含题目）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct QuestionnaireDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub questionnaire: Questionnaire,
    pub questions: Vec<Question>,
    pub response_count: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct QuestionnaireListResponse {
    pub items: Vec<Questionnaire>,
    pub pagination: PaginationInfo,
}

// 学生视角：分配给自己年级的问卷
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct AssignedQuestionnaire {
    #[serde(flatten)]
    #[ts(flatten)]
    pub questionnaire: Questionnaire,
    pub question_count: u64,
    pub answered: bool,
    pub score: Option<f64>,
}

// 教师视角：作答记录与学生姓名
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct QuestionnaireResponseView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub response: QuestionnaireResponse,
    pub student_name: String,
}
