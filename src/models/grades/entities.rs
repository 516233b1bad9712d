use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成绩：某学生在某科目某阶段的一次评分
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub phase: i32,
    pub score: f64,
    pub weight: f64,
    pub description: Option<String>,
    pub comment: Option<String>,
    /// 由问卷自动生成时指向问卷
    pub questionnaire_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
