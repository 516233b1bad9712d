use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorEvaluationService;
use crate::models::{
    ApiResponse, ErrorCode,
    indicator_evaluations::requests::{EvaluateIndicatorRequest, UpsertIndicatorEvaluation},
};
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_score;

pub async fn evaluate(
    service: &IndicatorEvaluationService,
    indicator_id: i64,
    student_id: i64,
    req: EvaluateIndicatorRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(score) = req.score
        && let Err(msg) = validate_score(score, service.rules())
    {
        return Ok(bad_request(ErrorCode::ScoreOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let indicator = match storage.get_indicator_by_id(indicator_id).await {
        Ok(Some(indicator)) => indicator,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::IndicatorNotFound,
                "Indicator not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to evaluate indicator")),
    };

    if !actor.can_manage(indicator.teacher_id) {
        return Ok(forbidden("Only the owning teacher can evaluate this indicator"));
    }

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to evaluate indicator")),
    };

    if !indicator.applies_to(&student) {
        return Ok(
            HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                ErrorCode::IndicatorNotApplicable,
                "Indicator does not apply to this student",
            )),
        );
    }

    let evaluation = UpsertIndicatorEvaluation {
        indicator_id: indicator.id,
        student_id: student.id,
        teacher_id: indicator.teacher_id,
        achieved: req.achieved,
        score: req.score,
        comment: req.comment,
    };

    match storage.upsert_indicator_evaluation(evaluation).await {
        Ok(saved) => {
            tracing::debug!(
                "Indicator {} evaluated for student {}: achieved={}",
                saved.indicator_id,
                saved.student_id,
                saved.achieved
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "指标评价已保存")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to evaluate indicator")),
    }
}
