use super::entities::StudentInfo;
use crate::models::common::PaginationInfo;
use crate::models::improvement_plans::entities::PlanStatus;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<StudentInfo>,
    pub pagination: PaginationInfo,
}

// 某科目某阶段的得分
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct SubjectPhaseScore {
    pub subject: String,
    pub teacher_id: i64,
    pub score: f64,
    pub passed: bool,
    pub grade_count: usize,
}

// 改进计划进度摘要
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct PlanProgressSummary {
    pub plan_id: i64,
    pub subject: String,
    pub status: PlanStatus,
    pub approved_activities: usize,
    pub total_activities: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct PhaseProgress {
    pub phase: i32,
    pub subjects: Vec<SubjectPhaseScore>,
    pub plans: Vec<PlanProgressSummary>,
}

// 学生学业进度
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentProgressResponse {
    pub student: StudentInfo,
    pub pass_threshold: f64,
    pub phases: Vec<PhaseProgress>,
}
