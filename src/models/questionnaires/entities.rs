use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 问卷
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct Questionnaire {
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subject: String,
    pub grade_level: i32,
    pub phase: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 选择题
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct Question {
    pub id: i64,
    pub questionnaire_id: i64,
    pub position: i32,
    pub text: String,
    pub options: Vec<String>,
    /// 学生视图中隐藏
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<i32>,
}

impl Question {
    /// 去掉正确答案
    pub fn redacted(mut self) -> Self {
        self.correct_option = None;
        self
    }
}

// 学生作答记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/questionnaire.ts")]
pub struct QuestionnaireResponse {
    pub id: i64,
    pub questionnaire_id: i64,
    pub student_id: i64,
    pub answers: Vec<i32>,
    pub correct_count: i32,
    pub total_questions: i32,
    pub score: f64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
