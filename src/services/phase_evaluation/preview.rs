use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PhaseEvaluationService, resolve_teacher_id};
use crate::config::AppConfig;
use crate::errors::SEIOError;
use crate::models::{ApiResponse, ErrorCode, phase_evaluation::requests::PreviewParams};
use crate::services::{bad_request, resolve_actor};
use crate::utils::validate::validate_phase;

pub async fn preview_student(
    service: &PhaseEvaluationService,
    student_id: i64,
    query: PreviewParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_phase(query.phase, &AppConfig::get().evaluation) {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let teacher_id = match resolve_teacher_id(&storage, &actor, query.teacher_id).await {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    let evaluator = service.evaluator(request)?;
    let subject = query.subject.filter(|s| !s.trim().is_empty());
    match evaluator
        .preview(teacher_id, student_id, query.phase, subject)
        .await
    {
        Ok(preview) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            preview,
            "Evaluation preview generated",
        ))),
        Err(SEIOError::NotFound(_)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::StudentNotFound, "Student not found"),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to preview evaluation")),
    }
}
