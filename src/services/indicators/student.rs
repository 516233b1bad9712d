use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorService;
use crate::models::{
    ApiResponse, ErrorCode,
    indicators::requests::{ApplicableIndicatorQuery, PhaseFilterParams},
};
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_phase;

pub async fn list_for_student(
    service: &IndicatorService,
    student_id: i64,
    query: PhaseFilterParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(phase) = query.phase
        && let Err(msg) = validate_phase(phase, service.rules())
    {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    if !actor.can_view_student(student_id) {
        return Ok(forbidden("Students can only view their own indicators"));
    }

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to list indicators")),
    };

    let filter = ApplicableIndicatorQuery {
        phase: query.phase,
        ..Default::default()
    };
    match storage.list_applicable_indicators(&student, filter).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Indicators retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list indicators")),
    }
}
