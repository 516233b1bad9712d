mod common;

use common::TestEnv;
use seio::models::activities::requests::NewRecoveryActivity;
use seio::models::grades::requests::{GradeListQuery, NewGrade, PhaseGradeQuery};
use seio::models::improvement_plans::{
    entities::{FailedIndicator, PlanStatus},
    requests::{ImprovementPlanPatch, NewImprovementPlan},
};
use seio::models::indicators::requests::ApplicableIndicatorQuery;
use seio::models::questionnaires::requests::{
    CreateQuestionnaireRequest, NewQuestionnaireResponse, QuestionInput,
    UpdateQuestionnaireRequest,
};

fn new_plan(student_id: i64, teacher_id: i64) -> NewImprovementPlan {
    NewImprovementPlan {
        student_id,
        teacher_id,
        subject: "Mathematics".to_string(),
        phase: 1,
        title: "Improvement plan - Mathematics - phase 1".to_string(),
        description: None,
        failed_indicators: vec![FailedIndicator {
            indicator_id: 1,
            description: "Solves equations".to_string(),
        }],
        phase_score: Some(2.0),
        deadline: None,
    }
}

fn activity(title: &str) -> NewRecoveryActivity {
    NewRecoveryActivity {
        title: title.to_string(),
        description: None,
        indicator_id: None,
        due_date: None,
        guide_token: None,
    }
}

#[tokio::test]
async fn duplicate_plan_key_is_a_conflict() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;

    let plan = env
        .storage
        .create_improvement_plan(new_plan(student.id, teacher.id), vec![activity("Practice")])
        .await
        .unwrap();
    assert_eq!(plan.status, PlanStatus::Pending);
    assert_eq!(plan.failed_indicators.len(), 1);

    let err = env
        .storage
        .create_improvement_plan(new_plan(student.id, teacher.id), vec![activity("Again")])
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E010");

    // 失败的创建不能留下孤立的活动
    let activities = env.storage.list_plan_activities(plan.id).await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].title, "Practice");
}

#[tokio::test]
async fn completed_at_follows_status() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    let plan = env
        .storage
        .create_improvement_plan(new_plan(student.id, teacher.id), vec![])
        .await
        .unwrap();

    let completed = env
        .storage
        .update_improvement_plan(
            plan.id,
            ImprovementPlanPatch {
                status: Some(PlanStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(completed.completed_at.is_some());

    let reopened = env
        .storage
        .update_improvement_plan(
            plan.id,
            ImprovementPlanPatch {
                status: Some(PlanStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
async fn deleting_user_cascades_to_profile_and_plans() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    let plan = env
        .storage
        .create_improvement_plan(new_plan(student.id, teacher.id), vec![activity("Practice")])
        .await
        .unwrap();

    assert!(env.storage.delete_user(student.user_id).await.unwrap());

    assert!(env.storage.get_student_by_id(student.id).await.unwrap().is_none());
    assert!(
        env.storage
            .get_improvement_plan_by_id(plan.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn questionnaire_response_is_unique_per_student() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;

    let detail = env
        .storage
        .create_questionnaire(
            teacher.id,
            CreateQuestionnaireRequest {
                title: "Fractions check".to_string(),
                description: None,
                category: Some("diagnostic".to_string()),
                subject: "Mathematics".to_string(),
                grade_level: 7,
                phase: 1,
                questions: vec![
                    QuestionInput {
                        text: "1/2 + 1/4 = ?".to_string(),
                        options: vec!["3/4".to_string(), "2/6".to_string()],
                        correct_option: 0,
                    },
                    QuestionInput {
                        text: "2/3 of 9 = ?".to_string(),
                        options: vec!["3".to_string(), "6".to_string()],
                        correct_option: 1,
                    },
                ],
            },
        )
        .await
        .unwrap();
    assert_eq!(detail.questions.len(), 2);
    let questionnaire_id = detail.questionnaire.id;

    let response = || NewQuestionnaireResponse {
        questionnaire_id,
        student_id: student.id,
        answers: vec![0, 0],
        correct_count: 1,
        total_questions: 2,
        score: 2.5,
    };
    let grade = || NewGrade {
        student_id: student.id,
        teacher_id: teacher.id,
        subject: "Mathematics".to_string(),
        phase: 1,
        score: 2.5,
        weight: 1.0,
        description: Some("Fractions check".to_string()),
        comment: None,
        questionnaire_id: Some(questionnaire_id),
    };

    env.storage
        .submit_questionnaire_response(response(), grade())
        .await
        .unwrap();
    let err = env
        .storage
        .submit_questionnaire_response(response(), grade())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E010");

    // 作答同时写入了一条成绩，重复提交没有再写
    let grades = env.storage.list_student_grades(student.id).await.unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].questionnaire_id, Some(questionnaire_id));

    let assigned = env
        .storage
        .list_assigned_questionnaires(student.id, 7)
        .await
        .unwrap();
    assert_eq!(assigned.len(), 1);
    assert!(assigned[0].answered);
    assert_eq!(assigned[0].score, Some(2.5));
    assert_eq!(
        env.storage
            .count_questionnaire_responses(questionnaire_id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn updating_questions_replaces_them() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let detail = env
        .storage
        .create_questionnaire(
            teacher.id,
            CreateQuestionnaireRequest {
                title: "Warm up".to_string(),
                description: None,
                category: None,
                subject: "Mathematics".to_string(),
                grade_level: 7,
                phase: 1,
                questions: vec![QuestionInput {
                    text: "2 + 2 = ?".to_string(),
                    options: vec!["4".to_string(), "5".to_string()],
                    correct_option: 0,
                }],
            },
        )
        .await
        .unwrap();

    let updated = env
        .storage
        .update_questionnaire(
            detail.questionnaire.id,
            UpdateQuestionnaireRequest {
                title: Some("Warm up v2".to_string()),
                questions: Some(vec![
                    QuestionInput {
                        text: "3 + 3 = ?".to_string(),
                        options: vec!["6".to_string(), "7".to_string()],
                        correct_option: 0,
                    },
                    QuestionInput {
                        text: "3 x 3 = ?".to_string(),
                        options: vec!["6".to_string(), "9".to_string()],
                        correct_option: 1,
                    },
                ]),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.questionnaire.title, "Warm up v2");
    assert_eq!(updated.questions.len(), 2);
    assert_eq!(updated.questions[0].text, "3 + 3 = ?");
}

#[tokio::test]
async fn applicable_indicators_include_personal_ones() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    let other = env.student("eva@school.test", None).await;

    let global = env.indicator(&teacher, "Mathematics", "Adds fractions").await;
    let personal = env
        .storage
        .create_indicator(
            teacher.id,
            seio::models::indicators::requests::CreateIndicatorRequest {
                subject: "Mathematics".to_string(),
                phase: 1,
                description: "Reviews long division".to_string(),
                category: None,
                grade_level: None,
                student_id: Some(student.id),
            },
        )
        .await
        .unwrap();

    let mine = env
        .storage
        .list_applicable_indicators(&student, ApplicableIndicatorQuery::default())
        .await
        .unwrap();
    let ids: Vec<i64> = mine.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![global.id, personal.id]);

    let theirs = env
        .storage
        .list_applicable_indicators(&other, ApplicableIndicatorQuery::default())
        .await
        .unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].id, global.id);
}

#[tokio::test]
async fn indicator_evaluation_is_upserted() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    let indicator = env.indicator(&teacher, "Mathematics", "Adds fractions").await;

    env.mark(&indicator, &student, false).await;
    env.mark(&indicator, &student, true).await;

    let evaluations = env
        .storage
        .list_indicator_evaluations(indicator.id)
        .await
        .unwrap();
    assert_eq!(evaluations.len(), 1);
    assert!(evaluations[0].achieved);
}

#[tokio::test]
async fn phase_grades_are_filtered() {
    let env = TestEnv::new().await;
    let ana = env.teacher("ana@school.test", "Mathematics").await;
    let ben = env.teacher("ben@school.test", "Science").await;
    let luis = env.student("luis@school.test", None).await;
    let eva = env.student("eva@school.test", None).await;

    env.grade(&ana, &luis, "Mathematics", 3.0).await;
    env.grade(&ana, &eva, "Mathematics", 4.0).await;
    env.grade(&ben, &luis, "Science", 2.0).await;
    env.grade_in_phase(&ana, &luis, "Mathematics", 2, 5.0).await;

    let phase_one = env
        .storage
        .list_phase_grades(PhaseGradeQuery {
            phase: 1,
            teacher_id: Some(ana.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(phase_one.len(), 2);
    assert!(phase_one[0].student_id <= phase_one[1].student_id);

    let page = env
        .storage
        .list_grades_with_pagination(GradeListQuery {
            page: Some(1),
            size: Some(2),
            student_id: Some(luis.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 3);
}
