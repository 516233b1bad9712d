use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, resolve_actor};

pub async fn delete_indicator(
    service: &IndicatorService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
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
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to delete indicator")),
    };

    if !actor.can_manage(indicator.teacher_id) {
        return Ok(forbidden("Only the owning teacher can delete this indicator"));
    }

    match storage.delete_indicator(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("指标删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::IndicatorNotFound,
            "Indicator not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to delete indicator")),
    }
}
