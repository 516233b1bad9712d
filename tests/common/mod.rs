#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use seio::config::{DatabaseConfig, EvaluationConfig};
use seio::errors::{Result, SEIOError};
use seio::mailer::{Mailer, OutgoingMail};
use seio::models::grades::requests::NewGrade;
use seio::models::indicator_evaluations::requests::UpsertIndicatorEvaluation;
use seio::models::indicators::{entities::Indicator, requests::CreateIndicatorRequest};
use seio::models::students::entities::Student;
use seio::models::teachers::entities::Teacher;
use seio::models::users::{
    entities::UserRole,
    requests::{CreateUserRequest, StudentProfileInput, TeacherProfileInput},
};
use seio::services::PhaseEvaluator;
use seio::storage::{Storage, sea_orm_storage::SeaOrmStorage};

/// 记录所有发出邮件的测试后端，可切换为失败模式
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    failing: Mutex<bool>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(SEIOError::mail("smtp unavailable"));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// 临时 SQLite 数据库与上传目录
pub struct TestEnv {
    pub dir: TempDir,
    pub storage: Arc<dyn Storage>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestEnv {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("seio.db");
        let config = DatabaseConfig {
            url: db_path.display().to_string(),
            pool_size: 1,
            timeout: 5,
        };
        let storage = SeaOrmStorage::new_with_config(&config)
            .await
            .expect("storage");
        Self {
            dir,
            storage: Arc::new(storage),
            mailer: Arc::new(RecordingMailer::default()),
        }
    }

    pub fn upload_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn evaluator(&self) -> PhaseEvaluator {
        self.evaluator_with(EvaluationConfig::default())
    }

    pub fn evaluator_with(&self, settings: EvaluationConfig) -> PhaseEvaluator {
        PhaseEvaluator::new(
            self.storage.clone(),
            self.mailer.clone(),
            settings,
            self.upload_dir(),
            "SEIO",
        )
    }

    pub async fn teacher(&self, email: &str, subject: &str) -> Teacher {
        let detail = self
            .storage
            .create_user(CreateUserRequest {
                email: email.to_string(),
                password: "not-a-real-hash".to_string(),
                role: UserRole::Teacher,
                first_name: "Ana".to_string(),
                last_name: "Rojas".to_string(),
                phone: None,
                teacher: Some(TeacherProfileInput {
                    subject: subject.to_string(),
                    institution: Some("Colegio Central".to_string()),
                }),
                student: None,
            })
            .await
            .expect("create teacher");
        detail.teacher.expect("teacher profile")
    }

    pub async fn student(&self, email: &str, guardian_email: Option<&str>) -> Student {
        let detail = self
            .storage
            .create_user(CreateUserRequest {
                email: email.to_string(),
                password: "not-a-real-hash".to_string(),
                role: UserRole::Student,
                first_name: "Luis".to_string(),
                last_name: "Pérez".to_string(),
                phone: None,
                teacher: None,
                student: Some(StudentProfileInput {
                    grade_level: 7,
                    group_name: Some("7A".to_string()),
                    guardian_name: guardian_email.map(|_| "María Pérez".to_string()),
                    guardian_email: guardian_email.map(str::to_string),
                }),
            })
            .await
            .expect("create student");
        detail.student.expect("student profile")
    }

    pub async fn grade(&self, teacher: &Teacher, student: &Student, subject: &str, score: f64) {
        self.grade_in_phase(teacher, student, subject, 1, score).await;
    }

    pub async fn grade_in_phase(
        &self,
        teacher: &Teacher,
        student: &Student,
        subject: &str,
        phase: i32,
        score: f64,
    ) {
        self.storage
            .create_grade(NewGrade {
                student_id: student.id,
                teacher_id: teacher.id,
                subject: subject.to_string(),
                phase,
                score,
                weight: 1.0,
                description: None,
                comment: None,
                questionnaire_id: None,
            })
            .await
            .expect("create grade");
    }

    pub async fn indicator(&self, teacher: &Teacher, subject: &str, description: &str) -> Indicator {
        self.storage
            .create_indicator(
                teacher.id,
                CreateIndicatorRequest {
                    subject: subject.to_string(),
                    phase: 1,
                    description: description.to_string(),
                    category: None,
                    grade_level: Some(7),
                    student_id: None,
                },
            )
            .await
            .expect("create indicator")
    }

    pub async fn mark(&self, indicator: &Indicator, student: &Student, achieved: bool) {
        self.storage
            .upsert_indicator_evaluation(UpsertIndicatorEvaluation {
                indicator_id: indicator.id,
                student_id: student.id,
                teacher_id: indicator.teacher_id,
                achieved,
                score: None,
                comment: None,
            })
            .await
            .expect("evaluate indicator");
    }
}
