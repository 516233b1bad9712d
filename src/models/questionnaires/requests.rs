use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct QuestionInput {
    pub text: String,
    pub options: Vec<String>,
    /// 从 0 开始的选项下标
    pub correct_option: i32,
}

// 创建问卷请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct CreateQuestionnaireRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subject: String,
    pub grade_level: i32,
    pub phase: i32,
    pub questions: Vec<QuestionInput>,
}

// 更新问卷请求，questions 存在时整体替换题目
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct UpdateQuestionnaireRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<i32>,
    pub phase: Option<i32>,
    pub questions: Option<Vec<QuestionInput>>,
}

// 提交作答请求：每题一个选项下标
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct SubmitResponseRequest {
    pub answers: Vec<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct QuestionnaireListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub subject: Option<String>,
    pub grade_level: Option<i32>,
    pub phase: Option<i32>,
    pub category: Option<String>,
    pub search: Option<String>,
}

// 问卷列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct QuestionnaireListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub subject: Option<String>,
    pub grade_level: Option<i32>,
    pub phase: Option<i32>,
    pub category: Option<String>,
    pub search: Option<String>,
}

// 作答记录写入参数（分数已计算好）
#[derive(Debug, Clone)]
pub struct NewQuestionnaireResponse {
    pub questionnaire_id: i64,
    pub student_id: i64,
    pub answers: Vec<i32>,
    pub correct_count: i32,
    pub total_questions: i32,
    pub score: f64,
}
