use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, resolve_actor};

pub async fn delete_grade(
    service: &GradeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
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
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to delete grade")),
    };

    if !actor.can_manage(grade.teacher_id) {
        return Ok(forbidden("Only the teacher who recorded this grade can delete it"));
    }

    match storage.delete_grade(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("成绩已删除"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to delete grade")),
    }
}
