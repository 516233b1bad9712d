use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorService;
use super::create::MAX_DESCRIPTION_CHARS;
use crate::models::{ApiResponse, ErrorCode, indicators::requests::UpdateIndicatorRequest};
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::{validate_phase, validate_required_text};

pub async fn update_indicator(
    service: &IndicatorService,
    id: i64,
    req: UpdateIndicatorRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(subject) = &req.subject
        && let Err(msg) = validate_required_text("subject", subject, 100)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(description) = &req.description
        && let Err(msg) = validate_required_text("description", description, MAX_DESCRIPTION_CHARS)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(phase) = req.phase
        && let Err(msg) = validate_phase(phase, service.rules())
    {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let indicator = match storage.get_indicator_by_id(id).await {
        Ok(Some(indicator)) => indicator,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::IndicatorNotFound,
                "Indicator not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to update indicator")),
    };

    if !actor.can_manage(indicator.teacher_id) {
        return Ok(forbidden("Only the owning teacher can modify this indicator"));
    }

    match storage.update_indicator(id, req).await {
        Ok(Some(indicator)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            indicator,
            "Indicator updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::IndicatorNotFound,
            "Indicator not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to update indicator")),
    }
}
