use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ActivityService, ensure_file_exists};
use crate::models::{
    ApiResponse, ErrorCode,
    activities::requests::{CreateActivityRequest, NewRecoveryActivity},
};
use crate::services::improvement_plans::load_plan;
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_required_text;

pub async fn create_activity(
    service: &ActivityService,
    plan_id: i64,
    req: CreateActivityRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required_text("title", &req.title, 200) {
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
        return Ok(forbidden("Only the owning teacher can add activities"));
    }

    if let Some(token) = &req.guide_token
        && let Err(response) = ensure_file_exists(&storage, token).await
    {
        return Ok(response);
    }

    match storage
        .create_activity(plan.id, NewRecoveryActivity::from(req))
        .await
    {
        Ok(activity) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(activity, "补救活动创建成功")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to create recovery activity")),
    }
}
