use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorEvaluationService;
use crate::models::{
    ApiResponse, ErrorCode,
    indicator_evaluations::entities::IndicatorWithEvaluation,
    indicators::requests::{ApplicableIndicatorQuery, PhaseFilterParams},
};
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_phase;

pub async fn get_student_evaluations(
    service: &IndicatorEvaluationService,
    student_id: i64,
    query: PhaseFilterParams,
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
    if !actor.can_view_student(student_id) {
        return Ok(forbidden("Students can only view their own evaluations"));
    }

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load evaluations")),
    };

    let filter = ApplicableIndicatorQuery {
        phase: query.phase,
        ..Default::default()
    };
    let indicators = match storage.list_applicable_indicators(&student, filter).await {
        Ok(indicators) => indicators,
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load evaluations")),
    };

    let ids: Vec<i64> = indicators.iter().map(|i| i.id).collect();
    let mut evaluations: HashMap<i64, _> = match storage.list_student_evaluations(student.id, &ids).await {
        Ok(evaluations) => evaluations
            .into_iter()
            .map(|evaluation| (evaluation.indicator_id, evaluation))
            .collect(),
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to load evaluations")),
    };

    let items: Vec<IndicatorWithEvaluation> = indicators
        .into_iter()
        .map(|indicator| IndicatorWithEvaluation {
            evaluation: evaluations.remove(&indicator.id),
            indicator,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Indicator evaluations retrieved successfully",
    )))
}
