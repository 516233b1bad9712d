use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ImprovementPlanService, load_plan};
use crate::models::{
    ApiResponse,
    activities::entities::ActivityStatus,
    improvement_plans::{entities::PlanProgress, responses::PlanDetailResponse},
};
use crate::services::{Actor, forbidden, resolve_actor};

/// 计划所属教师、计划对应的学生或管理员可见
pub(crate) fn can_view_plan(actor: &Actor, student_id: i64, teacher_id: i64) -> bool {
    match actor {
        Actor::Admin(_) => true,
        Actor::Teacher(_, teacher) => teacher.id == teacher_id,
        Actor::Student(_, student) => student.id == student_id,
    }
}

pub async fn get_plan(
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
    if !can_view_plan(&actor, plan.student_id, plan.teacher_id) {
        return Ok(forbidden("You cannot view this improvement plan"));
    }

    let activities = match storage.list_plan_activities(plan.id).await {
        Ok(activities) => activities,
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load improvement plan")),
    };
    let student = match storage.get_student_info(plan.student_id).await {
        Ok(student) => student,
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load improvement plan")),
    };

    let approved = activities
        .iter()
        .filter(|a| a.status == ActivityStatus::Approved)
        .count();
    let progress = PlanProgress::new(approved, activities.len());

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PlanDetailResponse {
            plan,
            student,
            activities,
            progress,
        },
        "Improvement plan retrieved successfully",
    )))
}
