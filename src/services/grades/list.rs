use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::{
    ApiResponse, ErrorCode,
    grades::requests::{GradeListParams, GradeListQuery},
};
use crate::services::bad_request;
use crate::utils::validate::validate_phase;

pub async fn list_grades(
    service: &GradeService,
    query: GradeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(phase) = query.phase
        && let Err(msg) = validate_phase(phase, service.rules())
    {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let list_query = GradeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id: query.student_id,
        teacher_id: query.teacher_id,
        subject: query.subject,
        phase: query.phase,
    };

    match storage.list_grades_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grade list retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list grades")),
    }
}
