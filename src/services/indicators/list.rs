use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorService;
use crate::models::{
    ApiResponse, ErrorCode,
    indicators::requests::{IndicatorListParams, IndicatorListQuery},
};
use crate::services::bad_request;
use crate::utils::validate::validate_phase;

pub async fn list_indicators(
    service: &IndicatorService,
    query: IndicatorListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(phase) = query.phase
        && let Err(msg) = validate_phase(phase, service.rules())
    {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let list_query = IndicatorListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id: query.teacher_id,
        subject: query.subject,
        phase: query.phase,
        grade_level: query.grade_level,
        student_id: query.student_id,
    };

    match storage.list_indicators_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Indicator list retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list indicators")),
    }
}
