use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ImprovementPlanService, load_plan};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, resolve_actor};

pub async fn delete_plan(
    service: &ImprovementPlanService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let plan = match load_plan(&storage, id).await {
        Ok(plan) => plan,
        Err(response) => return Ok(response),
    };
    if !actor.can_manage(plan.teacher_id) {
        return Ok(forbidden("Only the owning teacher can delete this plan"));
    }

    match storage.delete_improvement_plan(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("改进计划已删除"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PlanNotFound,
            "Improvement plan not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to delete improvement plan")),
    }
}
