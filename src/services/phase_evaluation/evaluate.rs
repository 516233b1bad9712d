use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EvaluationScope, PhaseEvaluationService, resolve_teacher_id};
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode, phase_evaluation::requests::EvaluatePhaseRequest};
use crate::services::{bad_request, resolve_actor};
use crate::utils::validate::{validate_grade_level, validate_phase};

pub async fn evaluate_phase(
    service: &PhaseEvaluationService,
    req: EvaluatePhaseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_phase(req.phase, &AppConfig::get().evaluation) {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }
    if let Some(grade_level) = req.grade_level
        && let Err(msg) = validate_grade_level(grade_level)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
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

    let scope = EvaluationScope {
        phase: req.phase,
        subject: req.subject.filter(|s| !s.trim().is_empty()),
        grade_level: req.grade_level,
        student_id: None,
    };

    let evaluator = service.evaluator(request)?;
    match evaluator.evaluate(teacher_id, scope, req.notify).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "阶段评估完成"))),
        Err(e) => {
            tracing::error!("Phase evaluation failed for teacher {}: {}", teacher_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::EvaluationFailed,
                    format!("Phase evaluation failed: {e}"),
                )),
            )
        }
    }
}
