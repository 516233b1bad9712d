use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EvaluationScope, PhaseEvaluationService, resolve_teacher_id};
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode, phase_evaluation::requests::EvaluateStudentRequest};
use crate::services::{bad_request, resolve_actor};
use crate::utils::validate::validate_phase;

pub async fn evaluate_student(
    service: &PhaseEvaluationService,
    student_id: i64,
    req: EvaluateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_phase(req.phase, &AppConfig::get().evaluation) {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let teacher_id = match resolve_teacher_id(&storage, &actor, req.teacher_id).await {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to evaluate student")),
    }

    let scope = EvaluationScope {
        phase: req.phase,
        subject: req.subject.filter(|s| !s.trim().is_empty()),
        grade_level: None,
        student_id: Some(student_id),
    };

    let evaluator = service.evaluator(request)?;
    match evaluator.evaluate(teacher_id, scope, req.notify).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "学生评估完成"))),
        Err(e) => {
            tracing::error!(
                "Phase evaluation failed for student {} (teacher {}): {}",
                student_id,
                teacher_id,
                e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::EvaluationFailed,
                    format!("Phase evaluation failed: {e}"),
                )),
            )
        }
    }
}
