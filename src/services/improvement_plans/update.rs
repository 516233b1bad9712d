use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ImprovementPlanService, load_plan};
use crate::models::{
    ApiResponse, ErrorCode,
    improvement_plans::requests::{ImprovementPlanPatch, UpdatePlanRequest},
};
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_required_text;

pub async fn update_plan(
    service: &ImprovementPlanService,
    id: i64,
    req: UpdatePlanRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(title) = &req.title
        && let Err(msg) = validate_required_text("title", title, 200)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

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
        return Ok(forbidden("Only the owning teacher can update this plan"));
    }

    if let Some(status) = req.status
        && status != plan.status
    {
        tracing::info!(
            "Improvement plan {} status {} -> {}",
            plan.id,
            plan.status,
            status
        );
    }

    match storage
        .update_improvement_plan(id, ImprovementPlanPatch::from(req))
        .await
    {
        Ok(Some(plan)) => Ok(HttpResponse::Ok().json(ApiResponse::success(plan, "改进计划更新成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PlanNotFound,
            "Improvement plan not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to update improvement plan")),
    }
}
