use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::ApiResponse;
use crate::services::{require_student, resolve_actor};

pub async fn my_grades(service: &GradeService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let student = match require_student(&actor) {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    match storage.list_student_grades(student.id).await {
        Ok(grades) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grades,
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to load grades")),
    }
}
