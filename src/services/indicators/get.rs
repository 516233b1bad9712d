use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_indicator(
    service: &IndicatorService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_indicator_by_id(id).await {
        Ok(Some(indicator)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            indicator,
            "Indicator retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::IndicatorNotFound,
            "Indicator not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to get indicator")),
    }
}
