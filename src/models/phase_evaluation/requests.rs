use serde::Deserialize;
use ts_rs::TS;

fn default_notify() -> bool {
    true
}

// 批量阶段评估请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub struct EvaluatePhaseRequest {
    pub phase: i32,
    pub subject: Option<String>,
    pub grade_level: Option<i32>,
    #[serde(default = "default_notify")]
    pub notify: bool,
    /// 仅管理员可代表其他教师执行
    pub teacher_id: Option<i64>,
}

// 单个学生评估请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub struct EvaluateStudentRequest {
    pub phase: i32,
    pub subject: Option<String>,
    #[serde(default = "default_notify")]
    pub notify: bool,
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub struct PreviewParams {
    pub phase: i32,
    pub subject: Option<String>,
    pub teacher_id: Option<i64>,
}
