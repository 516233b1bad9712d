use super::entities::{FailedIndicator, PlanStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 教师手动创建计划
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct CreatePlanRequest {
    pub student_id: i64,
    pub subject: String,
    pub phase: i32,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub indicator_ids: Vec<i64>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct UpdatePlanRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub teacher_notes: Option<String>,
    pub status: Option<PlanStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct PlanListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    pub phase: Option<i32>,
    pub status: Option<PlanStatus>,
    pub subject: Option<String>,
}

// 计划列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct PlanListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub phase: Option<i32>,
    pub status: Option<PlanStatus>,
    pub subject: Option<String>,
}

// 计划写入参数（用于存储层）
#[derive(Debug, Clone)]
pub struct NewImprovementPlan {
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub phase: i32,
    pub title: String,
    pub description: Option<String>,
    pub failed_indicators: Vec<FailedIndicator>,
    pub phase_score: Option<f64>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
}

// 计划局部更新（None 表示保持不变）
//
// status 变为 completed 时存储层写入 completed_at，变为其他状态时清空。
#[derive(Debug, Clone, Default)]
pub struct ImprovementPlanPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub teacher_notes: Option<String>,
    pub status: Option<PlanStatus>,
    pub phase_score: Option<f64>,
    pub failed_indicators: Option<Vec<FailedIndicator>>,
    pub document_token: Option<String>,
    pub email_sent_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<UpdatePlanRequest> for ImprovementPlanPatch {
    fn from(req: UpdatePlanRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            deadline: req.deadline,
            teacher_notes: req.teacher_notes,
            status: req.status,
            ..Default::default()
        }
    }
}
