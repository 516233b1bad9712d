use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionnaireService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, resolve_actor};

pub async fn list_responses(
    service: &QuestionnaireService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let questionnaire = match storage.get_questionnaire_by_id(id).await {
        Ok(Some(q)) => q,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::QuestionnaireNotFound,
                "Questionnaire not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to list responses")),
    };

    if !actor.can_manage(questionnaire.teacher_id) {
        return Ok(forbidden("Only the owning teacher can view responses"));
    }

    match storage.list_questionnaire_responses(id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Responses retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list responses")),
    }
}
