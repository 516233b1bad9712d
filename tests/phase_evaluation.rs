mod common;

use common::TestEnv;
use seio::config::EvaluationConfig;
use seio::models::improvement_plans::{entities::PlanStatus, requests::ImprovementPlanPatch};
use seio::models::phase_evaluation::responses::EvaluationOutcome;
use seio::services::phase_evaluation::EvaluationScope;

fn phase_one() -> EvaluationScope {
    EvaluationScope {
        phase: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn failing_score_creates_plan_and_sends_document() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;

    let fractions = env.indicator(&teacher, "Mathematics", "Adds fractions").await;
    let equations = env.indicator(&teacher, "Mathematics", "Solves equations").await;
    let geometry = env.indicator(&teacher, "Mathematics", "Computes areas").await;
    env.mark(&fractions, &student, true).await;
    env.mark(&equations, &student, false).await;

    env.grade(&teacher, &student, "Mathematics", 3.0).await;
    env.grade(&teacher, &student, "Mathematics", 3.4).await;

    let summary = env
        .evaluator()
        .evaluate(teacher.id, phase_one(), true)
        .await
        .unwrap();

    assert_eq!(summary.students, 1);
    assert_eq!(summary.evaluated, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.plans_created, 1);
    assert_eq!(summary.notifications_sent, 1);

    let result = &summary.results[0];
    assert_eq!(result.outcome, EvaluationOutcome::PlanCreated);
    assert!((result.phase_score - 3.2).abs() < 1e-9);
    assert!(result.notification_sent);
    assert!(result.warnings.is_empty());

    // 未达成与未评价的指标都算未通过
    let failed: Vec<i64> = result
        .failed_indicators
        .iter()
        .map(|i| i.indicator_id)
        .collect();
    assert_eq!(failed, vec![equations.id, geometry.id]);

    let plan = env
        .storage
        .get_improvement_plan_by_id(result.plan_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.status, PlanStatus::Pending);
    assert_eq!(plan.subject, "Mathematics");
    assert!(plan.deadline.is_some());
    assert!(plan.email_sent_at.is_some());

    let activities = env.storage.list_plan_activities(plan.id).await.unwrap();
    assert_eq!(activities.len(), 2);

    let token = plan.document_token.expect("document token");
    let file = env.storage.get_file_by_token(&token).await.unwrap().unwrap();
    assert_eq!(file.file_type, "application/pdf");
    let on_disk = std::fs::read(env.upload_dir().join(&file.stored_name)).unwrap();
    assert!(on_disk.starts_with(b"%PDF"));

    let sent = env.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["luis@school.test".to_string()]);
    assert!(sent[0].cc.is_empty());
    assert_eq!(sent[0].attachments.len(), 1);
    assert_eq!(sent[0].attachments[0].content_type, "application/pdf");
    assert!(sent[0].body.contains("Solves equations"));
}

#[tokio::test]
async fn score_at_threshold_passes() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Science").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&teacher, &student, "Science", 3.0).await;
    env.grade(&teacher, &student, "Science", 4.0).await;

    let summary = env
        .evaluator()
        .evaluate(teacher.id, phase_one(), true)
        .await
        .unwrap();

    assert_eq!(summary.passed, 1);
    assert_eq!(summary.results[0].outcome, EvaluationOutcome::Passed);
    assert_eq!(summary.results[0].plan_id, None);
    assert!(env.mailer.sent().is_empty());
    assert!(env.storage.list_student_plans(student.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn rerun_updates_plan_without_second_email() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "History").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&teacher, &student, "History", 2.0).await;

    let evaluator = env.evaluator();
    let first = evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();
    assert_eq!(first.plans_created, 1);

    env.grade(&teacher, &student, "History", 3.0).await;
    let second = evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();

    assert_eq!(second.plans_created, 0);
    assert_eq!(second.plans_updated, 1);
    assert_eq!(second.notifications_sent, 0);
    assert_eq!(second.results[0].plan_id, first.results[0].plan_id);
    assert_eq!(env.mailer.sent().len(), 1);

    let plans = env.storage.list_student_plans(student.id).await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].phase_score, Some(2.5));
}

#[tokio::test]
async fn passing_reevaluation_closes_open_plan() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&teacher, &student, "Mathematics", 3.0).await;

    let evaluator = env.evaluator();
    let first = evaluator.evaluate(teacher.id, phase_one(), false).await.unwrap();
    let plan_id = first.results[0].plan_id.unwrap();

    env.grade(&teacher, &student, "Mathematics", 5.0).await;
    let second = evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();

    assert_eq!(second.plans_resolved, 1);
    assert_eq!(second.results[0].outcome, EvaluationOutcome::PlanResolved);

    let plan = env
        .storage
        .get_improvement_plan_by_id(plan_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.status, PlanStatus::Completed);
    assert!(plan.completed_at.is_some());
    assert_eq!(plan.phase_score, Some(4.0));
    assert!(plan.teacher_notes.unwrap().contains("pass threshold"));
    assert!(env.mailer.sent().is_empty());
}

#[tokio::test]
async fn closed_plan_is_left_unchanged() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&teacher, &student, "Mathematics", 1.5).await;

    let evaluator = env.evaluator();
    let first = evaluator.evaluate(teacher.id, phase_one(), false).await.unwrap();
    let plan_id = first.results[0].plan_id.unwrap();
    env.storage
        .update_improvement_plan(
            plan_id,
            ImprovementPlanPatch {
                status: Some(PlanStatus::Failed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let second = evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();
    assert_eq!(second.results[0].outcome, EvaluationOutcome::Unchanged);
    assert_eq!(second.results[0].plan_id, Some(plan_id));
    assert!(env.mailer.sent().is_empty());

    let plan = env
        .storage
        .get_improvement_plan_by_id(plan_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.status, PlanStatus::Failed);
}

#[tokio::test]
async fn guardian_is_copied_when_enabled() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env
        .student("luis@school.test", Some("maria@family.test"))
        .await;
    env.grade(&teacher, &student, "Mathematics", 2.0).await;

    env.evaluator()
        .evaluate(teacher.id, phase_one(), true)
        .await
        .unwrap();

    let sent = env.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].cc, vec!["maria@family.test".to_string()]);
}

#[tokio::test]
async fn guardian_is_not_copied_when_disabled() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env
        .student("luis@school.test", Some("maria@family.test"))
        .await;
    env.grade(&teacher, &student, "Mathematics", 2.0).await;

    let settings = EvaluationConfig {
        notify_guardians: false,
        ..Default::default()
    };
    env.evaluator_with(settings)
        .evaluate(teacher.id, phase_one(), true)
        .await
        .unwrap();

    assert!(env.mailer.sent()[0].cc.is_empty());
}

#[tokio::test]
async fn mail_failure_keeps_plan_and_retries_on_next_run() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&teacher, &student, "Mathematics", 2.0).await;

    env.mailer.set_failing(true);
    let evaluator = env.evaluator();
    let first = evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();

    let result = &first.results[0];
    assert_eq!(result.outcome, EvaluationOutcome::PlanCreated);
    assert!(!result.notification_sent);
    assert_eq!(result.warnings.len(), 1);

    let plan = env
        .storage
        .get_improvement_plan_by_id(result.plan_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(plan.document_token.is_some());
    assert!(plan.email_sent_at.is_none());

    env.mailer.set_failing(false);
    let second = evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();
    assert_eq!(second.results[0].outcome, EvaluationOutcome::PlanUpdated);
    assert!(second.results[0].notification_sent);
    assert_eq!(env.mailer.sent().len(), 1);
}

#[tokio::test]
async fn repeated_notification_keeps_only_latest_document() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&teacher, &student, "Mathematics", 2.0).await;

    let evaluator = env.evaluator();
    env.mailer.set_failing(true);
    let first = evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();
    let plan_id = first.results[0].plan_id.unwrap();
    let first_token = env
        .storage
        .get_improvement_plan_by_id(plan_id)
        .await
        .unwrap()
        .unwrap()
        .document_token
        .unwrap();
    for _ in 0..2 {
        evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();
    }
    env.mailer.set_failing(false);
    let last = evaluator.evaluate(teacher.id, phase_one(), true).await.unwrap();
    assert!(last.results[0].notification_sent);

    let stored: Vec<_> = std::fs::read_dir(env.upload_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(stored.len(), 1);

    let plan = env
        .storage
        .get_improvement_plan_by_id(plan_id)
        .await
        .unwrap()
        .unwrap();
    let token = plan.document_token.unwrap();
    assert_ne!(token, first_token);
    assert_eq!(stored[0], format!("{token}.pdf"));
    assert!(env.storage.get_file_by_token(&token).await.unwrap().is_some());
    assert!(env.storage.get_file_by_token(&first_token).await.unwrap().is_none());
}

#[tokio::test]
async fn notify_disabled_skips_document_and_mail() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&teacher, &student, "Mathematics", 2.0).await;

    let summary = env
        .evaluator()
        .evaluate(teacher.id, phase_one(), false)
        .await
        .unwrap();

    assert_eq!(summary.plans_created, 1);
    assert_eq!(summary.notifications_sent, 0);
    let plan = env
        .storage
        .get_improvement_plan_by_id(summary.results[0].plan_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(plan.document_token.is_none());
    assert!(env.mailer.sent().is_empty());
}

#[tokio::test]
async fn evaluation_is_scoped_to_teacher_and_phase() {
    let env = TestEnv::new().await;
    let ana = env.teacher("ana@school.test", "Mathematics").await;
    let ben = env.teacher("ben@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&ana, &student, "Mathematics", 4.5).await;
    env.grade(&ben, &student, "Mathematics", 1.0).await;
    env.grade_in_phase(&ana, &student, "Mathematics", 2, 1.0).await;

    let summary = env
        .evaluator()
        .evaluate(ana.id, phase_one(), true)
        .await
        .unwrap();

    assert_eq!(summary.evaluated, 1);
    assert_eq!(summary.passed, 1);
    assert!(env.storage.list_student_plans(student.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_phase_is_rejected() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;

    let err = env
        .evaluator()
        .evaluate(
            teacher.id,
            EvaluationScope {
                phase: 5,
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");
}

#[tokio::test]
async fn preview_has_no_side_effects() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    env.indicator(&teacher, "Mathematics", "Solves equations").await;
    env.grade(&teacher, &student, "Mathematics", 2.0).await;
    env.grade(&teacher, &student, "Mathematics", 3.0).await;

    let preview = env
        .evaluator()
        .preview(teacher.id, student.id, 1, None)
        .await
        .unwrap();

    assert_eq!(preview.subjects.len(), 1);
    let subject = &preview.subjects[0];
    assert!(!subject.passed);
    assert_eq!(subject.grade_count, 2);
    assert_eq!(subject.failed_indicators.len(), 1);
    assert!(subject.existing_plan.is_none());

    assert!(env.storage.list_student_plans(student.id).await.unwrap().is_empty());
    assert!(env.mailer.sent().is_empty());
}
