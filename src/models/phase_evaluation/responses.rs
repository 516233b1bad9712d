use serde::Serialize;
use ts_rs::TS;

use crate::models::improvement_plans::entities::{FailedIndicator, PlanStatus};

// 单个 (学生, 科目) 的评估结果
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub enum EvaluationOutcome {
    /// 通过且没有待关闭的计划
    Passed,
    /// 通过并关闭了进行中的计划
    PlanResolved,
    PlanCreated,
    PlanUpdated,
    /// 未通过但已有关闭的计划
    Unchanged,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub struct SubjectEvaluationResult {
    pub student_id: i64,
    pub student_name: String,
    pub subject: String,
    pub phase_score: f64,
    pub passed: bool,
    pub failed_indicators: Vec<FailedIndicator>,
    pub outcome: EvaluationOutcome,
    pub plan_id: Option<i64>,
    pub notification_sent: bool,
    /// 文档或邮件失败等不影响计划的问题
    pub warnings: Vec<String>,
}

// 批量评估摘要
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub struct EvaluationSummary {
    pub phase: i32,
    pub teacher_id: i64,
    pub pass_threshold: f64,
    pub students: usize,
    pub evaluated: usize,
    pub passed: usize,
    pub failed: usize,
    pub plans_created: usize,
    pub plans_updated: usize,
    pub plans_resolved: usize,
    pub notifications_sent: usize,
    pub results: Vec<SubjectEvaluationResult>,
}

impl EvaluationSummary {
    pub fn new(phase: i32, teacher_id: i64, pass_threshold: f64) -> Self {
        Self {
            phase,
            teacher_id,
            pass_threshold,
            students: 0,
            evaluated: 0,
            passed: 0,
            failed: 0,
            plans_created: 0,
            plans_updated: 0,
            plans_resolved: 0,
            notifications_sent: 0,
            results: Vec::new(),
        }
    }

    /// 累计一条结果
    pub fn record(&mut self, result: SubjectEvaluationResult) {
        self.evaluated += 1;
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        match result.outcome {
            EvaluationOutcome::PlanCreated => self.plans_created += 1,
            EvaluationOutcome::PlanUpdated => self.plans_updated += 1,
            EvaluationOutcome::PlanResolved => self.plans_resolved += 1,
            EvaluationOutcome::Passed | EvaluationOutcome::Unchanged => {}
        }
        if result.notification_sent {
            self.notifications_sent += 1;
        }
        self.results.push(result);
    }
}

// 已存在计划的简要信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub struct ExistingPlanBrief {
    pub id: i64,
    pub status: PlanStatus,
    pub phase_score: Option<f64>,
}

// 预览（无副作用）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub struct SubjectPreview {
    pub subject: String,
    pub phase_score: f64,
    pub passed: bool,
    pub grade_count: usize,
    pub failed_indicators: Vec<FailedIndicator>,
    pub existing_plan: Option<ExistingPlanBrief>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase_evaluation.ts")]
pub struct StudentPreviewResponse {
    pub student_id: i64,
    pub student_name: String,
    pub phase: i32,
    pub teacher_id: i64,
    pub pass_threshold: f64,
    pub subjects: Vec<SubjectPreview>,
}
