mod common;

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use common::TestEnv;
use seio::config::AppConfig;
use seio::mailer::Mailer;
use seio::models::activities::requests::NewRecoveryActivity;
use seio::models::files::entities::{File, NewFile};
use seio::models::improvement_plans::{
    entities::{ImprovementPlan, PlanStatus},
    requests::{ImprovementPlanPatch, NewImprovementPlan},
};
use seio::models::questionnaires::requests::{CreateQuestionnaireRequest, QuestionInput};
use seio::models::students::entities::Student;
use seio::models::teachers::entities::Teacher;
use seio::models::users::{entities::UserRole, requests::CreateUserRequest};
use seio::routes;
use seio::storage::Storage;
use seio::utils::jwt::JwtUtils;
use seio::utils::password::hash_password;
use seio::utils::{json_error_handler, query_error_handler};

macro_rules! init_app {
    ($env:expr) => {{
        let storage: Arc<dyn Storage> = $env.storage.clone();
        let mailer: Arc<dyn Mailer> = $env.mailer.clone();
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(mailer))
                .configure(routes::configure_api_routes),
        )
        .await
    }};
}

fn bearer(user_id: i64, role: UserRole) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user_id, &role.to_string()).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

async fn math_plan(env: &TestEnv, teacher: &Teacher, student: &Student) -> ImprovementPlan {
    env.storage
        .create_improvement_plan(
            NewImprovementPlan {
                student_id: student.id,
                teacher_id: teacher.id,
                subject: "Mathematics".to_string(),
                phase: 1,
                title: "Improvement plan - Mathematics - phase 1".to_string(),
                description: None,
                failed_indicators: Vec::new(),
                phase_score: Some(2.5),
                deadline: None,
            },
            vec![NewRecoveryActivity {
                title: "Fractions worksheet".to_string(),
                description: None,
                indicator_id: None,
                due_date: None,
                guide_token: None,
            }],
        )
        .await
        .unwrap()
}

/// 在下载接口读取的上传目录中写入文件并登记
async fn stored_file(env: &TestEnv, owner_user_id: i64, content: &str) -> File {
    let token = uuid::Uuid::new_v4().to_string();
    let stored_name = format!("{token}.txt");
    let dir = std::path::Path::new(&AppConfig::get().upload.dir);
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(&stored_name), content).unwrap();

    env.storage
        .create_file(NewFile {
            token,
            original_name: "notes.txt".to_string(),
            stored_name,
            file_size: content.len() as i64,
            file_type: "text/plain".to_string(),
            user_id: owner_user_id,
        })
        .await
        .unwrap()
}

#[actix_web::test]
async fn login_issues_token_and_rejects_bad_password() {
    let env = TestEnv::new().await;
    env.storage
        .create_user(CreateUserRequest {
            email: "admin@seio.test".to_string(),
            password: hash_password("Secret123").unwrap(),
            role: UserRole::Admin,
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
            phone: None,
            teacher: None,
            student: None,
        })
        .await
        .unwrap();
    let app = init_app!(env);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr("10.20.0.1:5000".parse().unwrap())
        .set_json(json!({ "email": "admin@seio.test", "password": "Secret123" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert!(body["data"]["access_token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["user"]["email"], "admin@seio.test");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr("10.20.0.1:5000".parse().unwrap())
        .set_json(json!({ "email": "admin@seio.test", "password": "wrong-pass1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn protected_routes_require_token_and_role() {
    let env = TestEnv::new().await;
    let student = env.student("luis@school.test", None).await;
    let app = init_app!(env);

    let req = test::TestRequest::get().uri("/api/v1/grades").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/grades")
        .insert_header(bearer(student.user_id, UserRole::Student))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/grades/me")
        .insert_header(bearer(student.user_id, UserRole::Student))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn admin_cannot_create_grades_without_teacher_profile() {
    let env = TestEnv::new().await;
    let student = env.student("luis@school.test", None).await;
    let admin = env
        .storage
        .create_user(CreateUserRequest {
            email: "admin@seio.test".to_string(),
            password: "not-a-real-hash".to_string(),
            role: UserRole::Admin,
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
            phone: None,
            teacher: None,
            student: None,
        })
        .await
        .unwrap();
    let app = init_app!(env);

    let req = test::TestRequest::post()
        .uri("/api/v1/grades")
        .insert_header(bearer(admin.user.id, UserRole::Admin))
        .set_json(json!({ "student_id": student.id, "subject": "Mathematics", "phase": 1, "score": 3.0 }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn out_of_range_grade_is_rejected() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    let app = init_app!(env);

    let req = test::TestRequest::post()
        .uri("/api/v1/grades")
        .insert_header(bearer(teacher.user_id, UserRole::Teacher))
        .set_json(json!({ "student_id": student.id, "subject": "Mathematics", "phase": 1, "score": 7.5 }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn evaluation_to_completed_plan_flow() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    let classmate = env.student("eva@school.test", None).await;
    let app = init_app!(env);
    let teacher_auth = || bearer(teacher.user_id, UserRole::Teacher);
    let student_auth = || bearer(student.user_id, UserRole::Student);

    // 录入成绩
    let req = test::TestRequest::post()
        .uri("/api/v1/grades")
        .insert_header(teacher_auth())
        .set_json(json!({ "student_id": student.id, "subject": "Mathematics", "phase": 1, "score": 2.8 }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // 阶段评估（不发送通知）
    let req = test::TestRequest::post()
        .uri("/api/v1/phase-evaluation/evaluate")
        .insert_header(teacher_auth())
        .set_json(json!({ "phase": 1, "notify": false }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["plans_created"], 1);
    assert_eq!(body["data"]["results"][0]["outcome"], "plan_created");
    let plan_id = body["data"]["results"][0]["plan_id"].as_i64().unwrap();

    // 学生查看自己的计划
    let req = test::TestRequest::get()
        .uri("/api/v1/improvement-plans/me")
        .insert_header(student_auth())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["id"], plan_id);

    // 其他学生不能查看
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/improvement-plans/{plan_id}"))
        .insert_header(bearer(classmate.user_id, UserRole::Student))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/improvement-plans/{plan_id}/activities"))
        .insert_header(student_auth())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let activities = body["data"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    let activity_id = activities[0]["id"].as_i64().unwrap();

    // 教师不能审核尚未提交的活动
    let review_uri = format!("/api/v1/improvement-plans/{plan_id}/activities/{activity_id}/review");
    let req = test::TestRequest::post()
        .uri(&review_uri)
        .insert_header(teacher_auth())
        .set_json(json!({ "approved": true }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/improvement-plans/{plan_id}/activities/{activity_id}/submit"
        ))
        .insert_header(student_auth())
        .set_json(json!({ "response_text": "Completed the worksheet" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "submitted");

    let req = test::TestRequest::post()
        .uri(&review_uri)
        .insert_header(teacher_auth())
        .set_json(json!({ "approved": true, "feedback": "Well done", "score": 4.5 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "approved");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/improvement-plans/{plan_id}"))
        .insert_header(teacher_auth())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["plan"]["status"], "completed");
    assert!(env.mailer.sent().is_empty());
}

#[actix_web::test]
async fn preview_reports_without_creating_plans() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    env.grade(&teacher, &student, "Mathematics", 3.0).await;
    let app = init_app!(env);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/phase-evaluation/students/{}?phase=1",
            student.id
        ))
        .insert_header(bearer(teacher.user_id, UserRole::Teacher))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["subjects"][0]["passed"], false);
    assert!(body["data"]["subjects"][0]["existing_plan"].is_null());

    assert!(
        env.storage
            .list_student_plans(student.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[actix_web::test]
async fn student_view_of_questionnaire_hides_correct_answers() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    let questionnaire = env
        .storage
        .create_questionnaire(
            teacher.id,
            CreateQuestionnaireRequest {
                title: "Fractions check".to_string(),
                description: None,
                category: None,
                subject: "Mathematics".to_string(),
                grade_level: student.grade_level,
                phase: 1,
                questions: vec![QuestionInput {
                    text: "1/2 + 1/4 = ?".to_string(),
                    options: vec!["2/6".to_string(), "3/4".to_string()],
                    correct_option: 1,
                }],
            },
        )
        .await
        .unwrap();
    let app = init_app!(env);
    let uri = format!("/api/v1/questionnaires/{}", questionnaire.questionnaire.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(teacher.user_id, UserRole::Teacher))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["questions"][0]["correct_option"], 1);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(student.user_id, UserRole::Student))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let question = &body["data"]["questions"][0];
    assert_eq!(question["text"], "1/2 + 1/4 = ?");
    assert!(question["correct_option"].is_null());
}

#[actix_web::test]
async fn students_download_only_their_own_or_linked_files() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let luis = env.student("luis@school.test", None).await;
    let eva = env.student("eva@school.test", None).await;

    let own = stored_file(&env, luis.user_id, "luis notes").await;
    let classmate = stored_file(&env, eva.user_id, "eva notes").await;
    let document = stored_file(&env, teacher.user_id, "plan document").await;
    let plan = math_plan(&env, &teacher, &luis).await;
    env.storage
        .update_improvement_plan(
            plan.id,
            ImprovementPlanPatch {
                document_token: Some(document.token.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let app = init_app!(env);

    let download = |token: &str, user_id: i64| {
        test::TestRequest::get()
            .uri(&format!("/api/v1/files/download/{token}"))
            .insert_header(bearer(user_id, UserRole::Student))
            .to_request()
    };

    let res = test::call_service(&app, download(&own.token, luis.user_id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "luis notes");

    let res = test::call_service(&app, download(&document.token, luis.user_id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "plan document");

    let res = test::call_service(&app, download(&classmate.token, luis.user_id)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = test::call_service(&app, download(&document.token, eva.user_id)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let dir = std::path::Path::new(&AppConfig::get().upload.dir);
    for file in [own, classmate, document] {
        let _ = std::fs::remove_file(dir.join(file.stored_name));
    }
}

#[actix_web::test]
async fn closed_plan_rejects_activity_submission() {
    let env = TestEnv::new().await;
    let teacher = env.teacher("ana@school.test", "Mathematics").await;
    let student = env.student("luis@school.test", None).await;
    let plan = math_plan(&env, &teacher, &student).await;
    env.storage
        .update_improvement_plan(
            plan.id,
            ImprovementPlanPatch {
                status: Some(PlanStatus::Failed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let activity_id = env.storage.list_plan_activities(plan.id).await.unwrap()[0].id;
    let app = init_app!(env);

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/improvement-plans/{}/activities/{activity_id}/submit",
            plan.id
        ))
        .insert_header(bearer(student.user_id, UserRole::Student))
        .set_json(json!({ "response_text": "Late work" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let activity = env.storage.get_activity_by_id(activity_id).await.unwrap().unwrap();
    assert_eq!(activity.status.to_string(), "pending");
    assert!(activity.submitted_at.is_none());
}
