use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ActivityService, ensure_file_exists, load_activity};
use crate::models::{
    ApiResponse, ErrorCode,
    activities::requests::{RecoveryActivityPatch, UpdateActivityRequest},
};
use crate::services::improvement_plans::load_plan;
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_required_text;

pub async fn update_activity(
    service: &ActivityService,
    plan_id: i64,
    activity_id: i64,
    req: UpdateActivityRequest,
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

    let plan = match load_plan(&storage, plan_id).await {
        Ok(plan) => plan,
        Err(response) => return Ok(response),
    };
    if !actor.can_manage(plan.teacher_id) {
        return Ok(forbidden("Only the owning teacher can update activities"));
    }
    if let Err(response) = load_activity(&storage, plan.id, activity_id).await {
        return Ok(response);
    }

    if let Some(token) = &req.guide_token
        && let Err(response) = ensure_file_exists(&storage, token).await
    {
        return Ok(response);
    }

    match storage
        .update_activity(activity_id, RecoveryActivityPatch::from(req))
        .await
    {
        Ok(Some(activity)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(activity, "补救活动更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Recovery activity not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to update recovery activity")),
    }
}
