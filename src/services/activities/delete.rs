use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ActivityService, load_activity};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::improvement_plans::load_plan;
use crate::services::{forbidden, resolve_actor};

pub async fn delete_activity(
    service: &ActivityService,
    plan_id: i64,
    activity_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let plan = match load_plan(&storage, plan_id).await {
        Ok(plan) => plan,
        Err(response) => return Ok(response),
    };
    if !actor.can_manage(plan.teacher_id) {
        return Ok(forbidden("Only the owning teacher can delete activities"));
    }
    if let Err(response) = load_activity(&storage, plan.id, activity_id).await {
        return Ok(response);
    }

    match storage.delete_activity(activity_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("补救活动已删除"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Recovery activity not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to delete recovery activity")),
    }
}
