use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ImprovementPlanService;
use crate::models::{
    ApiResponse, ErrorCode,
    improvement_plans::requests::{PlanListParams, PlanListQuery},
};
use crate::services::{Actor, bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_phase;

pub async fn list_plans(
    service: &ImprovementPlanService,
    query: PlanListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(phase) = query.phase
        && let Err(msg) = validate_phase(phase, service.rules())
    {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    // 教师只看自己的计划，管理员看全部
    let teacher_id = match &actor {
        Actor::Admin(_) => None,
        Actor::Teacher(_, teacher) => Some(teacher.id),
        Actor::Student(..) => return Ok(forbidden("Students should use /improvement-plans/me")),
    };

    let list_query = PlanListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id,
        student_id: query.student_id,
        phase: query.phase,
        status: query.status,
        subject: query.subject,
    };

    match storage.list_improvement_plans_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Improvement plans retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list improvement plans")),
    }
}
