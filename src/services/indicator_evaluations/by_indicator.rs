use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorEvaluationService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_for_indicator(
    service: &IndicatorEvaluationService,
    indicator_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_indicator_by_id(indicator_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::IndicatorNotFound,
                "Indicator not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to list evaluations")),
    }

    match storage.list_indicator_evaluations(indicator_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Evaluations retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list evaluations")),
    }
}
