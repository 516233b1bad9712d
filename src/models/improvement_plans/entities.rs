use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 改进计划状态
//
// pending → in_progress → completed | failed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub enum PlanStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl PlanStatus {
    /// 仍可被阶段评估更新
    pub fn is_open(&self) -> bool {
        matches!(self, PlanStatus::Pending | PlanStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PlanStatus::Pending),
            "in_progress" => Ok(PlanStatus::InProgress),
            "completed" => Ok(PlanStatus::Completed),
            "failed" => Ok(PlanStatus::Failed),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

// 计划创建时记录的未达成指标
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct FailedIndicator {
    pub indicator_id: i64,
    pub description: String,
}

// 改进计划
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct ImprovementPlan {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub phase: i32,
    pub title: String,
    pub description: Option<String>,
    pub failed_indicators: Vec<FailedIndicator>,
    pub phase_score: Option<f64>,
    pub status: PlanStatus,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub teacher_notes: Option<String>,
    /// 生成的 PDF 文件
    pub document_token: Option<String>,
    pub email_sent_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 计划进度
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/improvement_plan.ts")]
pub struct PlanProgress {
    pub total_activities: usize,
    pub approved_activities: usize,
    pub percentage: f64,
}

impl PlanProgress {
    pub fn new(approved_activities: usize, total_activities: usize) -> Self {
        let percentage = if total_activities == 0 {
            0.0
        } else {
            crate::utils::scoring::round2(
                approved_activities as f64 * 100.0 / total_activities as f64,
            )
        };
        Self {
            total_activities,
            approved_activities,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_statuses() {
        assert!(PlanStatus::Pending.is_open());
        assert!(PlanStatus::InProgress.is_open());
        assert!(!PlanStatus::Completed.is_open());
        assert!(!PlanStatus::Failed.is_open());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(PlanStatus::InProgress.to_string(), "in_progress");
        assert_eq!("failed".parse::<PlanStatus>(), Ok(PlanStatus::Failed));
        assert!("done".parse::<PlanStatus>().is_err());
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(PlanProgress::new(0, 0).percentage, 0.0);
        assert_eq!(PlanProgress::new(1, 3).percentage, 33.33);
        assert_eq!(PlanProgress::new(2, 2).percentage, 100.0);
    }
}
