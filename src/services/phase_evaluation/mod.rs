pub mod evaluate;
pub mod evaluator;
pub mod preview;
pub mod student;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    phase_evaluation::requests::{EvaluatePhaseRequest, EvaluateStudentRequest, PreviewParams},
};
use crate::services::{Actor, bad_request, forbidden};
use crate::storage::Storage;

pub use evaluator::{EvaluationScope, PhaseEvaluator};

pub struct PhaseEvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl PhaseEvaluationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn evaluator(&self, request: &HttpRequest) -> ActixResult<PhaseEvaluator> {
        let config = AppConfig::get();
        Ok(PhaseEvaluator::new(
            self.get_storage(request)?,
            super::mailer_from_request(request)?,
            config.evaluation.clone(),
            config.upload.dir.clone(),
            config.app.system_name.clone(),
        ))
    }

    // 批量评估
    pub async fn evaluate(
        &self,
        req: EvaluatePhaseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        evaluate::evaluate_phase(self, req, request).await
    }

    // 单个学生预览（无副作用）
    pub async fn preview_student(
        &self,
        student_id: i64,
        query: PreviewParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        preview::preview_student(self, student_id, query, request).await
    }

    // 单个学生评估
    pub async fn evaluate_student(
        &self,
        student_id: i64,
        req: EvaluateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student::evaluate_student(self, student_id, req, request).await
    }
}

/// 确定评估所针对的教师
///
/// 教师只能评估自己的成绩；管理员必须指定 teacher_id。
pub(crate) async fn resolve_teacher_id(
    storage: &Arc<dyn Storage>,
    actor: &Actor,
    requested: Option<i64>,
) -> Result<i64, HttpResponse> {
    match actor {
        Actor::Teacher(_, teacher) => match requested {
            Some(id) if id != teacher.id => {
                Err(forbidden("Teachers can only evaluate their own grades"))
            }
            _ => Ok(teacher.id),
        },
        Actor::Admin(_) => {
            let Some(teacher_id) = requested else {
                return Err(bad_request(
                    ErrorCode::BadRequest,
                    "teacher_id is required when an administrator runs an evaluation",
                ));
            };
            match storage.get_teacher_info(teacher_id).await {
                Ok(Some(_)) => Ok(teacher_id),
                Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::TeacherNotFound,
                    "Teacher not found",
                ))),
                Err(e) => Err(ApiResponse::from_error(&e, "Failed to load teacher")),
            }
        }
        Actor::Student(..) => Err(forbidden("Students cannot run phase evaluations")),
    }
}
