use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生档案（与用户 1-1）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    /// 就读年级 1..=11
    pub grade_level: i32,
    pub group_name: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生档案与姓名、邮箱，用于列表、通知和文档
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentInfo {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub grade_level: i32,
    pub group_name: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
}

impl StudentInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

pub const MIN_GRADE_LEVEL: i32 = 1;
pub const MAX_GRADE_LEVEL: i32 = 11;
