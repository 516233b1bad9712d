use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionnaireService;
use crate::models::ApiResponse;
use crate::services::{require_student, resolve_actor};

pub async fn list_assigned(
    service: &QuestionnaireService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let student = match require_student(&actor) {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    match storage
        .list_assigned_questionnaires(student.id, student.grade_level)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Assigned questionnaires retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list assigned questionnaires")),
    }
}
