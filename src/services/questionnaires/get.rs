use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionnaireService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Actor, forbidden, resolve_actor};

pub async fn get_questionnaire(
    service: &QuestionnaireService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let mut detail = match storage.get_questionnaire_detail(id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::QuestionnaireNotFound,
                "Questionnaire not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to get questionnaire")),
    };

    if let Actor::Student(_, student) = &actor {
        if detail.questionnaire.grade_level != student.grade_level {
            return Ok(forbidden("Questionnaire is not assigned to your grade level"));
        }
        detail.questions = detail
            .questions
            .into_iter()
            .map(|question| question.redacted())
            .collect();
        detail.response_count = 0;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Questionnaire retrieved successfully",
    )))
}
