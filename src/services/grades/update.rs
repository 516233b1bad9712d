use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::{ApiResponse, ErrorCode, grades::requests::UpdateGradeRequest};
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::{validate_score, validate_weight};

pub async fn update_grade(
    service: &GradeService,
    id: i64,
    req: UpdateGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(score) = req.score
        && let Err(msg) = validate_score(score, service.rules())
    {
        return Ok(bad_request(ErrorCode::ScoreOutOfRange, msg));
    }
    if let Some(weight) = req.weight
        && let Err(msg) = validate_weight(weight)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let grade = match storage.get_grade_by_id(id).await {
        Ok(Some(grade)) => grade,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradeNotFound,
                "Grade not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to update grade")),
    };

    if !actor.can_manage(grade.teacher_id) {
        return Ok(forbidden("Only the teacher who recorded this grade can change it"));
    }

    match storage.update_grade(id, req).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "成绩更新成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to update grade")),
    }
}
