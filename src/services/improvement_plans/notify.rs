use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ImprovementPlanService, load_plan};
use crate::models::ApiResponse;
use crate::services::{forbidden, resolve_actor};

pub async fn notify_plan(
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
        return Ok(forbidden("Only the owning teacher can notify this plan"));
    }

    let notifier = service.notifier(request)?;
    match notifier.notify(&plan).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "通知已发送"))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to notify improvement plan")),
    }
}
