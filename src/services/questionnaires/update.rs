use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionnaireService;
use super::create::{MAX_TITLE_CHARS, validate_questions};
use crate::models::{
    ApiResponse, ErrorCode, questionnaires::requests::UpdateQuestionnaireRequest,
};
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::{validate_grade_level, validate_phase, validate_required_text};

pub async fn update_questionnaire(
    service: &QuestionnaireService,
    id: i64,
    req: UpdateQuestionnaireRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(title) = &req.title
        && let Err(msg) = validate_required_text("title", title, MAX_TITLE_CHARS)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(subject) = &req.subject
        && let Err(msg) = validate_required_text("subject", subject, 100)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(grade_level) = req.grade_level
        && let Err(msg) = validate_grade_level(grade_level)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(phase) = req.phase
        && let Err(msg) = validate_phase(phase, service.rules())
    {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }
    if let Some(questions) = &req.questions
        && let Err(msg) = validate_questions(questions)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

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
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to update questionnaire")),
    };

    if !actor.can_manage(questionnaire.teacher_id) {
        return Ok(forbidden("Only the owning teacher can modify this questionnaire"));
    }

    // 已有作答时不允许替换题目
    if req.questions.is_some() {
        match storage.count_questionnaire_responses(id).await {
            Ok(0) => {}
            Ok(count) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::QuestionnaireHasResponses,
                    format!("Questions cannot change after {count} responses were submitted"),
                )));
            }
            Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to update questionnaire")),
        }
    }

    match storage.update_questionnaire(id, req).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Questionnaire updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionnaireNotFound,
            "Questionnaire not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to update questionnaire")),
    }
}
