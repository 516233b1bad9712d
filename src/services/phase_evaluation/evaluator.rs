//! 阶段评估
//!
//! 对某教师某阶段的成绩逐个学生、逐个科目计算阶段得分，
//! 未通过时创建或更新改进计划并发送文档，通过时关闭进行中的计划。
//! 文档与邮件失败只记为警告，不回滚计划也不中断批处理。

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::config::EvaluationConfig;
use crate::errors::{Result, SEIOError};
use crate::mailer::Mailer;
use crate::models::{
    grades::requests::PhaseGradeQuery,
    improvement_plans::{
        entities::{FailedIndicator, ImprovementPlan, PlanStatus},
        requests::{ImprovementPlanPatch, NewImprovementPlan},
    },
    indicators::{entities::Indicator, requests::ApplicableIndicatorQuery},
    phase_evaluation::responses::{
        EvaluationOutcome, EvaluationSummary, ExistingPlanBrief, StudentPreviewResponse,
        SubjectEvaluationResult, SubjectPreview,
    },
    students::entities::{Student, StudentInfo},
};
use crate::services::improvement_plans::{PlanNotifier, default_plan_title, seed_activities};
use crate::storage::Storage;
use crate::utils::scoring::{PhaseScore, is_passing, phase_scores_by_student};

/// 评估范围
#[derive(Debug, Clone, Default)]
pub struct EvaluationScope {
    pub phase: i32,
    pub subject: Option<String>,
    pub grade_level: Option<i32>,
    pub student_id: Option<i64>,
}

/// 某学生在本阶段的上下文
struct StudentContext {
    student: Student,
    info: StudentInfo,
    indicators: Vec<Indicator>,
    achieved: HashSet<i64>,
}

impl StudentContext {
    /// 本科目下未达成的指标（没有评价也算未达成）
    fn failed_indicators(&self, subject: &str) -> Vec<FailedIndicator> {
        failed_indicators(&self.indicators, &self.achieved, subject)
    }
}

pub(crate) fn failed_indicators(
    indicators: &[Indicator],
    achieved: &HashSet<i64>,
    subject: &str,
) -> Vec<FailedIndicator> {
    indicators
        .iter()
        .filter(|i| i.subject == subject && !achieved.contains(&i.id))
        .map(|i| FailedIndicator {
            indicator_id: i.id,
            description: i.description.clone(),
        })
        .collect()
}

pub(crate) fn resolution_note(existing: Option<&str>, score: f64, threshold: f64) -> String {
    let note = format!(
        "Closed automatically on {}: phase score {score:.2} reached the pass threshold {threshold:.2}.",
        Utc::now().format("%Y-%m-%d")
    );
    match existing.map(str::trim).filter(|n| !n.is_empty()) {
        Some(previous) => format!("{previous}\n{note}"),
        None => note,
    }
}

pub struct PhaseEvaluator {
    storage: Arc<dyn Storage>,
    notifier: PlanNotifier,
    settings: EvaluationConfig,
}

impl PhaseEvaluator {
    pub fn new(
        storage: Arc<dyn Storage>,
        mailer: Arc<dyn Mailer>,
        settings: EvaluationConfig,
        upload_dir: impl Into<PathBuf>,
        system_name: impl Into<String>,
    ) -> Self {
        let notifier = PlanNotifier::new(
            storage.clone(),
            mailer,
            settings.clone(),
            upload_dir,
            system_name,
        );
        Self {
            storage,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &EvaluationConfig {
        &self.settings
    }

    fn check_phase(&self, phase: i32) -> Result<()> {
        if phase < 1 || phase > self.settings.phase_count {
            return Err(SEIOError::validation(format!(
                "phase must be between 1 and {}",
                self.settings.phase_count
            )));
        }
        Ok(())
    }

    async fn load_context(
        &self,
        teacher_id: i64,
        student_id: i64,
        phase: i32,
    ) -> Result<Option<StudentContext>> {
        let Some(student) = self.storage.get_student_by_id(student_id).await? else {
            return Ok(None);
        };
        let Some(info) = self.storage.get_student_info(student_id).await? else {
            return Ok(None);
        };

        let indicators = self
            .storage
            .list_applicable_indicators(
                &student,
                ApplicableIndicatorQuery {
                    teacher_id: Some(teacher_id),
                    subject: None,
                    phase: Some(phase),
                },
            )
            .await?;
        let ids: Vec<i64> = indicators.iter().map(|i| i.id).collect();
        let achieved = self
            .storage
            .list_student_evaluations(student.id, &ids)
            .await?
            .into_iter()
            .filter(|e| e.achieved)
            .map(|e| e.indicator_id)
            .collect();

        Ok(Some(StudentContext {
            student,
            info,
            indicators,
            achieved,
        }))
    }

    /// 批量评估，notify 为 false 时不生成文档也不发送邮件
    pub async fn evaluate(
        &self,
        teacher_id: i64,
        scope: EvaluationScope,
        notify: bool,
    ) -> Result<EvaluationSummary> {
        self.check_phase(scope.phase)?;

        let grades = self
            .storage
            .list_phase_grades(PhaseGradeQuery {
                phase: scope.phase,
                teacher_id: Some(teacher_id),
                student_id: scope.student_id,
                subject: scope.subject.clone(),
                grade_level: scope.grade_level,
            })
            .await?;

        let mut summary =
            EvaluationSummary::new(scope.phase, teacher_id, self.settings.pass_threshold);

        for (student_id, subjects) in phase_scores_by_student(&grades) {
            let Some(context) = self.load_context(teacher_id, student_id, scope.phase).await?
            else {
                warn!("Skipping student {student_id}: profile not found");
                continue;
            };
            summary.students += 1;

            for (subject, score) in subjects {
                let result = self
                    .evaluate_subject(teacher_id, scope.phase, &context, subject, score, notify)
                    .await?;
                summary.record(result);
            }
        }

        info!(
            "Phase {} evaluation for teacher {}: {} evaluated, {} passed, {} plans created, {} updated, {} resolved, {} notifications",
            summary.phase,
            teacher_id,
            summary.evaluated,
            summary.passed,
            summary.plans_created,
            summary.plans_updated,
            summary.plans_resolved,
            summary.notifications_sent
        );

        Ok(summary)
    }

    async fn evaluate_subject(
        &self,
        teacher_id: i64,
        phase: i32,
        context: &StudentContext,
        subject: String,
        score: PhaseScore,
        notify: bool,
    ) -> Result<SubjectEvaluationResult> {
        let student = &context.student;
        let passed = is_passing(score.score, self.settings.pass_threshold);
        let failed = context.failed_indicators(&subject);
        let existing = self
            .storage
            .find_improvement_plan(student.id, teacher_id, &subject, phase)
            .await?;

        let mut result = SubjectEvaluationResult {
            student_id: student.id,
            student_name: context.info.full_name(),
            subject: subject.clone(),
            phase_score: score.score,
            passed,
            failed_indicators: failed.clone(),
            outcome: EvaluationOutcome::Passed,
            plan_id: existing.as_ref().map(|p| p.id),
            notification_sent: false,
            warnings: Vec::new(),
        };

        if passed {
            if let Some(plan) = existing.filter(|p| p.status.is_open()) {
                let patch = ImprovementPlanPatch {
                    status: Some(PlanStatus::Completed),
                    phase_score: Some(score.score),
                    teacher_notes: Some(resolution_note(
                        plan.teacher_notes.as_deref(),
                        score.score,
                        self.settings.pass_threshold,
                    )),
                    ..Default::default()
                };
                self.storage.update_improvement_plan(plan.id, patch).await?;
                result.outcome = EvaluationOutcome::PlanResolved;
            }
            return Ok(result);
        }

        let (plan, should_notify) = match existing {
            None => {
                let deadline = Some(Utc::now() + Duration::days(self.settings.plan_deadline_days));
                let activities = seed_activities(&subject, &failed, deadline);
                let plan = self
                    .storage
                    .create_improvement_plan(
                        NewImprovementPlan {
                            student_id: student.id,
                            teacher_id,
                            title: default_plan_title(&subject, phase),
                            description: Some(format!(
                                "Phase score {:.2} is below the pass threshold {:.2}.",
                                score.score, self.settings.pass_threshold
                            )),
                            subject: subject.clone(),
                            phase,
                            failed_indicators: failed,
                            phase_score: Some(score.score),
                            deadline,
                        },
                        activities,
                    )
                    .await?;
                result.outcome = EvaluationOutcome::PlanCreated;
                (plan, notify)
            }
            Some(plan) if plan.status.is_open() => {
                let patch = ImprovementPlanPatch {
                    phase_score: Some(score.score),
                    failed_indicators: Some(failed),
                    ..Default::default()
                };
                let updated = self
                    .storage
                    .update_improvement_plan(plan.id, patch)
                    .await?
                    .ok_or_else(|| SEIOError::not_found(format!("improvement plan {}", plan.id)))?;
                result.outcome = EvaluationOutcome::PlanUpdated;
                let never_sent = updated.email_sent_at.is_none();
                (updated, notify && never_sent)
            }
            Some(_) => {
                result.outcome = EvaluationOutcome::Unchanged;
                return Ok(result);
            }
        };

        result.plan_id = Some(plan.id);
        if should_notify {
            self.send_plan(&plan, &mut result).await;
        }
        Ok(result)
    }

    async fn send_plan(&self, plan: &ImprovementPlan, result: &mut SubjectEvaluationResult) {
        match self.notifier.notify(plan).await {
            Ok(_) => result.notification_sent = true,
            Err(e) => {
                warn!(
                    "Improvement plan {} for student {}: notification failed: {}",
                    plan.id, plan.student_id, e
                );
                result.warnings.push(e.to_string());
            }
        }
    }

    /// 单个学生的评估预览，不产生任何写入
    pub async fn preview(
        &self,
        teacher_id: i64,
        student_id: i64,
        phase: i32,
        subject: Option<String>,
    ) -> Result<StudentPreviewResponse> {
        self.check_phase(phase)?;

        let context = self
            .load_context(teacher_id, student_id, phase)
            .await?
            .ok_or_else(|| SEIOError::not_found(format!("student {student_id}")))?;

        let grades = self
            .storage
            .list_phase_grades(PhaseGradeQuery {
                phase,
                teacher_id: Some(teacher_id),
                student_id: Some(student_id),
                subject,
                grade_level: None,
            })
            .await?;

        let mut subjects = Vec::new();
        if let Some(scores) = phase_scores_by_student(&grades).remove(&student_id) {
            for (subject, score) in scores {
                let existing_plan = self
                    .storage
                    .find_improvement_plan(student_id, teacher_id, &subject, phase)
                    .await?
                    .map(|plan| ExistingPlanBrief {
                        id: plan.id,
                        status: plan.status,
                        phase_score: plan.phase_score,
                    });
                subjects.push(SubjectPreview {
                    failed_indicators: context.failed_indicators(&subject),
                    passed: is_passing(score.score, self.settings.pass_threshold),
                    phase_score: score.score,
                    grade_count: score.grade_count,
                    existing_plan,
                    subject,
                });
            }
        }

        Ok(StudentPreviewResponse {
            student_id,
            student_name: context.info.full_name(),
            phase,
            teacher_id,
            pass_threshold: self.settings.pass_threshold,
            subjects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicator(id: i64, subject: &str) -> Indicator {
        Indicator {
            id,
            teacher_id: 1,
            subject: subject.to_string(),
            phase: 1,
            description: format!("indicator {id}"),
            category: None,
            grade_level: Some(7),
            student_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unevaluated_indicators_count_as_failed() {
        let indicators = vec![
            indicator(1, "Mathematics"),
            indicator(2, "Mathematics"),
            indicator(3, "Physics"),
        ];
        let achieved: HashSet<i64> = [1].into_iter().collect();
        let failed = failed_indicators(&indicators, &achieved, "Mathematics");
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].indicator_id, 2);
        assert!(failed_indicators(&indicators, &achieved, "History").is_empty());
    }

    #[test]
    fn test_resolution_note_appends() {
        let note = resolution_note(Some("Call parents"), 3.8, 3.5);
        assert!(note.starts_with("Call parents\n"));
        assert!(note.contains("3.80"));
        assert!(resolution_note(None, 4.0, 3.5).starts_with("Closed automatically"));
    }
}
