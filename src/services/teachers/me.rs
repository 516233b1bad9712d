use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{require_teacher, resolve_actor};

pub async fn get_me(service: &TeacherService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let teacher = match require_teacher(&actor) {
        Ok(teacher) => teacher,
        Err(response) => return Ok(response),
    };

    match storage.get_teacher_info(teacher.id).await {
        Ok(Some(info)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            info,
            "Teacher profile retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to get teacher profile")),
    }
}
