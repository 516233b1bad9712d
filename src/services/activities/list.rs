use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityService;
use crate::models::ApiResponse;
use crate::services::improvement_plans::{get::can_view_plan, load_plan};
use crate::services::{forbidden, resolve_actor};

pub async fn list_activities(
    service: &ActivityService,
    plan_id: i64,
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
    if !can_view_plan(&actor, plan.student_id, plan.teacher_id) {
        return Ok(forbidden("You cannot view this improvement plan"));
    }

    match storage.list_plan_activities(plan.id).await {
        Ok(activities) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            activities,
            "Recovery activities retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list recovery activities")),
    }
}
