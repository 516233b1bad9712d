use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::config::{AppConfig, EvaluationConfig};
use crate::models::{
    ApiResponse, ErrorCode,
    activities::entities::{ActivityStatus, RecoveryActivity},
    grades::entities::Grade,
    improvement_plans::entities::{ImprovementPlan, PlanProgress},
    students::{
        entities::StudentInfo,
        responses::{PhaseProgress, PlanProgressSummary, StudentProgressResponse, SubjectPhaseScore},
    },
};
use crate::services::{Actor, forbidden, resolve_actor};
use crate::utils::scoring::{is_passing, weighted_phase_score};

/// 按阶段汇总成绩与计划进度
///
/// 同一科目由不同教师评分时分别计算。
pub(crate) fn build_progress(
    student: StudentInfo,
    grades: &[Grade],
    plans: &[(ImprovementPlan, Vec<RecoveryActivity>)],
    settings: &EvaluationConfig,
) -> StudentProgressResponse {
    let phases = (1..=settings.phase_count)
        .map(|phase| {
            let mut grouped: BTreeMap<(String, i64), Vec<(f64, f64)>> = BTreeMap::new();
            for grade in grades.iter().filter(|g| g.phase == phase) {
                grouped
                    .entry((grade.subject.clone(), grade.teacher_id))
                    .or_default()
                    .push((grade.score, grade.weight));
            }

            let subjects = grouped
                .into_iter()
                .filter_map(|((subject, teacher_id), entries)| {
                    weighted_phase_score(entries).map(|score| SubjectPhaseScore {
                        subject,
                        teacher_id,
                        score: score.score,
                        passed: is_passing(score.score, settings.pass_threshold),
                        grade_count: score.grade_count,
                    })
                })
                .collect();

            let plans = plans
                .iter()
                .filter(|(plan, _)| plan.phase == phase)
                .map(|(plan, activities)| {
                    let approved = activities
                        .iter()
                        .filter(|a| a.status == ActivityStatus::Approved)
                        .count();
                    let progress = PlanProgress::new(approved, activities.len());
                    PlanProgressSummary {
                        plan_id: plan.id,
                        subject: plan.subject.clone(),
                        status: plan.status,
                        approved_activities: progress.approved_activities,
                        total_activities: progress.total_activities,
                        percentage: progress.percentage,
                    }
                })
                .collect();

            PhaseProgress {
                phase,
                subjects,
                plans,
            }
        })
        .collect();

    StudentProgressResponse {
        student,
        pass_threshold: settings.pass_threshold,
        phases,
    }
}

pub async fn get_progress(
    service: &StudentService,
    student_id: Option<i64>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let student_id = match (student_id, &actor) {
        (Some(id), _) => id,
        (None, Actor::Student(_, student)) => student.id,
        (None, _) => return Ok(forbidden("Only students have their own progress")),
    };

    if !actor.can_view_student(student_id) {
        return Ok(forbidden("Students can only view their own progress"));
    }

    let student = match storage.get_student_info(student_id).await {
        Ok(Some(info)) => info,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load student")),
    };

    let grades = match storage.list_student_grades(student_id).await {
        Ok(grades) => grades,
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load grades")),
    };

    let plans = match storage.list_student_plans(student_id).await {
        Ok(plans) => plans,
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load plans")),
    };

    let mut plans_with_activities = Vec::with_capacity(plans.len());
    for plan in plans {
        match storage.list_plan_activities(plan.id).await {
            Ok(activities) => plans_with_activities.push((plan, activities)),
            Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load activities")),
        }
    }

    let response = build_progress(
        student,
        &grades,
        &plans_with_activities,
        &AppConfig::get().evaluation,
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Student progress retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::improvement_plans::entities::PlanStatus;
    use chrono::Utc;

    fn student() -> StudentInfo {
        StudentInfo {
            id: 1,
            user_id: 10,
            first_name: "Ana".into(),
            last_name: "Lopez".into(),
            email: "ana@example.com".into(),
            grade_level: 7,
            group_name: Some("A".into()),
            guardian_name: None,
            guardian_email: None,
        }
    }

    fn grade(subject: &str, teacher_id: i64, phase: i32, score: f64, weight: f64) -> Grade {
        Grade {
            id: 0,
            student_id: 1,
            teacher_id,
            subject: subject.into(),
            phase,
            score,
            weight,
            description: None,
            comment: None,
            questionnaire_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn plan(id: i64, phase: i32) -> ImprovementPlan {
        ImprovementPlan {
            id,
            student_id: 1,
            teacher_id: 2,
            subject: "Mathematics".into(),
            phase,
            title: "Recovery".into(),
            description: None,
            failed_indicators: Vec::new(),
            phase_score: Some(3.0),
            status: PlanStatus::InProgress,
            deadline: None,
            teacher_notes: None,
            document_token: None,
            email_sent_at: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn activity(status: ActivityStatus) -> RecoveryActivity {
        RecoveryActivity {
            id: 0,
            plan_id: 1,
            title: "Worksheet".into(),
            description: None,
            indicator_id: None,
            due_date: None,
            guide_token: None,
            status,
            response_text: None,
            attachment_token: None,
            feedback: None,
            score: None,
            submitted_at: None,
            reviewed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_progress_groups_by_phase_and_subject() {
        let grades = vec![
            grade("Mathematics", 2, 1, 3.0, 1.0),
            grade("Mathematics", 2, 1, 4.0, 1.0),
            grade("Science", 3, 1, 4.5, 2.0),
            grade("Mathematics", 2, 2, 5.0, 1.0),
        ];
        let plans = vec![(
            plan(9, 1),
            vec![
                activity(ActivityStatus::Approved),
                activity(ActivityStatus::Submitted),
            ],
        )];

        let progress = build_progress(student(), &grades, &plans, &EvaluationConfig::default());

        assert_eq!(progress.phases.len(), 4);
        let phase1 = &progress.phases[0];
        assert_eq!(phase1.subjects.len(), 2);
        assert_eq!(phase1.subjects[0].subject, "Mathematics");
        assert_eq!(phase1.subjects[0].score, 3.5);
        assert!(phase1.subjects[0].passed);
        assert_eq!(phase1.plans.len(), 1);
        assert_eq!(phase1.plans[0].percentage, 50.0);

        let phase2 = &progress.phases[1];
        assert_eq!(phase2.subjects.len(), 1);
        assert!(phase2.plans.is_empty());
        assert!(progress.phases[3].subjects.is_empty());
    }
}
