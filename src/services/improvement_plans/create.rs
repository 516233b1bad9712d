use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, Utc};

use super::{ImprovementPlanService, seed_activities};
use crate::errors::SEIOError;
use crate::models::{
    ApiResponse, ErrorCode,
    improvement_plans::{
        entities::FailedIndicator,
        requests::{CreatePlanRequest, NewImprovementPlan},
    },
};
use crate::services::{bad_request, require_teacher, resolve_actor};
use crate::utils::validate::{validate_phase, validate_required_text};

pub async fn create_plan(
    service: &ImprovementPlanService,
    req: CreatePlanRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let rules = service.rules();
    if let Err(msg) = validate_phase(req.phase, rules) {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }
    if let Err(msg) = validate_required_text("subject", &req.subject, 100)
        .and_then(|_| validate_required_text("title", &req.title, 200))
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let teacher = match require_teacher(&actor) {
        Ok(teacher) => teacher,
        Err(response) => return Ok(response),
    };

    let student = match storage.get_student_by_id(req.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to create improvement plan")),
    };

    // 所选指标必须适用于该学生
    let mut failed_indicators = Vec::with_capacity(req.indicator_ids.len());
    for indicator_id in &req.indicator_ids {
        let indicator = match storage.get_indicator_by_id(*indicator_id).await {
            Ok(Some(indicator)) => indicator,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::IndicatorNotFound,
                    format!("Indicator {indicator_id} not found"),
                )));
            }
            Err(e) => {
                return Ok(ApiResponse::from_error(&e, "Failed to create improvement plan"));
            }
        };
        if !indicator.applies_to(&student) {
            return Ok(
                HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                    ErrorCode::IndicatorNotApplicable,
                    format!("Indicator {indicator_id} does not apply to this student"),
                )),
            );
        }
        failed_indicators.push(FailedIndicator {
            indicator_id: indicator.id,
            description: indicator.description,
        });
    }

    let subject = req.subject.trim().to_string();
    let deadline = req
        .deadline
        .or_else(|| Some(Utc::now() + Duration::days(rules.plan_deadline_days)));
    let activities = seed_activities(&subject, &failed_indicators, deadline);

    let plan = NewImprovementPlan {
        student_id: student.id,
        teacher_id: teacher.id,
        title: req.title.trim().to_string(),
        subject,
        phase: req.phase,
        description: req.description,
        failed_indicators,
        phase_score: None,
        deadline,
    };

    match storage.create_improvement_plan(plan, activities).await {
        Ok(plan) => {
            tracing::info!(
                "Teacher {} created improvement plan {} for student {}",
                teacher.id,
                plan.id,
                plan.student_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(plan, "改进计划创建成功")))
        }
        Err(SEIOError::Conflict(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::PlanAlreadyExists,
            "An improvement plan already exists for this student, subject and phase",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to create improvement plan")),
    }
}
