use super::entities::ActivityStatus;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct CreateActivityRequest {
    pub title: String,
    pub description: Option<String>,
    pub indicator_id: Option<i64>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub guide_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub guide_token: Option<String>,
}

// 学生提交：文本与附件至少其一
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct SubmitActivityRequest {
    pub response_text: Option<String>,
    pub attachment_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ReviewActivityRequest {
    pub approved: bool,
    pub feedback: Option<String>,
    pub score: Option<f64>,
}

// 活动写入参数（用于存储层）
#[derive(Debug, Clone)]
pub struct NewRecoveryActivity {
    pub title: String,
    pub description: Option<String>,
    pub indicator_id: Option<i64>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub guide_token: Option<String>,
}

// 活动局部更新（None 表示保持不变）
#[derive(Debug, Clone, Default)]
pub struct RecoveryActivityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub guide_token: Option<String>,
    pub status: Option<ActivityStatus>,
    pub response_text: Option<String>,
    pub attachment_token: Option<String>,
    pub feedback: Option<String>,
    pub score: Option<f64>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<UpdateActivityRequest> for RecoveryActivityPatch {
    fn from(req: UpdateActivityRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            guide_token: req.guide_token,
            ..Default::default()
        }
    }
}

impl From<CreateActivityRequest> for NewRecoveryActivity {
    fn from(req: CreateActivityRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            indicator_id: req.indicator_id,
            due_date: req.due_date,
            guide_token: req.guide_token,
        }
    }
}
