use super::entities::{ImprovementPlan, PlanProgress};
use crate::models::activities::entities::RecoveryActivity;
use crate::models::common::PaginationInfo;
use crate::models::students::entities::StudentInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct PlanListResponse {
    pub items: Vec<ImprovementPlan>,
    pub pagination: PaginationInfo,
}

// 计划详情：活动与进度
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct PlanDetailResponse {
    pub plan: ImprovementPlan,
    pub student: Option<StudentInfo>,
    pub activities: Vec<RecoveryActivity>,
    pub progress: PlanProgress,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct PlanNotifyResponse {
    pub plan_id: i64,
    pub recipients: Vec<String>,
    pub document_token: String,
    pub email_sent_at: chrono::DateTime<chrono::Utc>,
}
