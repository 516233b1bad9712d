use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionnaireService;
use crate::models::{
    ApiResponse, ErrorCode,
    questionnaires::requests::{QuestionnaireListParams, QuestionnaireListQuery},
};
use crate::services::{Actor, bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_phase;

pub async fn list_questionnaires(
    service: &QuestionnaireService,
    query: QuestionnaireListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(phase) = query.phase
        && let Err(msg) = validate_phase(phase, service.rules())
    {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    // 教师只看自己的问卷
    let teacher_id = match &actor {
        Actor::Admin(_) => None,
        Actor::Teacher(_, teacher) => Some(teacher.id),
        Actor::Student(..) => return Ok(forbidden("Students use the assigned questionnaire list")),
    };

    let list_query = QuestionnaireListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id,
        subject: query.subject,
        grade_level: query.grade_level,
        phase: query.phase,
        category: query.category,
        search: query.search,
    };

    match storage.list_questionnaires_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Questionnaire list retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to list questionnaires")),
    }
}
