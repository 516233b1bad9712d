use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ImprovementPlanService;
use crate::models::ApiResponse;
use crate::services::{require_student, resolve_actor};

pub async fn my_plans(
    service: &ImprovementPlanService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let student = match require_student(&actor) {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    match storage.list_student_plans(student.id).await {
        Ok(plans) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            plans,
            "Improvement plans retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to load improvement plans")),
    }
}
