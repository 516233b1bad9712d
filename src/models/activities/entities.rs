use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 补救活动状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum ActivityStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl ActivityStatus {
    /// 学生可提交（首次或被驳回后重交）
    pub fn accepts_submission(&self) -> bool {
        matches!(self, ActivityStatus::Pending | ActivityStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Pending => "pending",
            ActivityStatus::Submitted => "submitted",
            ActivityStatus::Approved => "approved",
            ActivityStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ActivityStatus::Pending),
            "submitted" => Ok(ActivityStatus::Submitted),
            "approved" => Ok(ActivityStatus::Approved),
            "rejected" => Ok(ActivityStatus::Rejected),
            _ => Err(format!("Invalid activity status: {s}")),
        }
    }
}

// 补救活动
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct RecoveryActivity {
    pub id: i64,
    pub plan_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// 针对的未达成指标
    pub indicator_id: Option<i64>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    /// 教师上传的指导材料
    pub guide_token: Option<String>,
    pub status: ActivityStatus,
    pub response_text: Option<String>,
    pub attachment_token: Option<String>,
    pub feedback: Option<String>,
    pub score: Option<f64>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_allowed_states() {
        assert!(ActivityStatus::Pending.accepts_submission());
        assert!(ActivityStatus::Rejected.accepts_submission());
        assert!(!ActivityStatus::Submitted.accepts_submission());
        assert!(!ActivityStatus::Approved.accepts_submission());
    }
}
