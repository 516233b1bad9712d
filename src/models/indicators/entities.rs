use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::students::entities::Student;

// 学习指标：要么面向某个年级（全局），要么面向单个学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct Indicator {
    pub id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub phase: i32,
    pub description: String,
    pub category: Option<String>,
    pub grade_level: Option<i32>,
    pub student_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Indicator {
    pub fn is_student_specific(&self) -> bool {
        self.student_id.is_some()
    }

    /// 指标是否适用于该学生
    pub fn applies_to(&self, student: &Student) -> bool {
        match self.student_id {
            Some(student_id) => student_id == student.id,
            None => self.grade_level == Some(student.grade_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn student(id: i64, grade_level: i32) -> Student {
        Student {
            id,
            user_id: id + 100,
            grade_level,
            group_name: None,
            guardian_name: None,
            guardian_email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn indicator(grade_level: Option<i32>, student_id: Option<i64>) -> Indicator {
        Indicator {
            id: 1,
            teacher_id: 1,
            subject: "Mathematics".into(),
            phase: 1,
            description: "Solves linear equations".into(),
            category: None,
            grade_level,
            student_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_global_indicator_matches_grade_level() {
        let global = indicator(Some(7), None);
        assert!(global.applies_to(&student(1, 7)));
        assert!(!global.applies_to(&student(1, 8)));
    }

    #[test]
    fn test_specific_indicator_ignores_grade_level() {
        let specific = indicator(None, Some(4));
        assert!(specific.applies_to(&student(4, 9)));
        assert!(!specific.applies_to(&student(5, 9)));
        assert!(specific.is_student_specific());
    }
}
