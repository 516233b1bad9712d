use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::questionnaires::requests::{
    CreateQuestionnaireRequest, QuestionnaireListParams, SubmitResponseRequest,
    UpdateQuestionnaireRequest,
};
use crate::services::QuestionnaireService;
use crate::utils::SafeIDI64;

static QUESTIONNAIRE_SERVICE: Lazy<QuestionnaireService> =
    Lazy::new(QuestionnaireService::new_lazy);

pub async fn list_questionnaires(
    req: HttpRequest,
    query: web::Query<QuestionnaireListParams>,
) -> ActixResult<HttpResponse> {
    QUESTIONNAIRE_SERVICE
        .list_questionnaires(query.into_inner(), &req)
        .await
}

pub async fn create_questionnaire(
    req: HttpRequest,
    body: web::Json<CreateQuestionnaireRequest>,
) -> ActixResult<HttpResponse> {
    QUESTIONNAIRE_SERVICE
        .create_questionnaire(body.into_inner(), &req)
        .await
}

pub async fn list_assigned(req: HttpRequest) -> ActixResult<HttpResponse> {
    QUESTIONNAIRE_SERVICE.list_assigned(&req).await
}

pub async fn get_questionnaire(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUESTIONNAIRE_SERVICE.get_questionnaire(id.0, &req).await
}

pub async fn update_questionnaire(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateQuestionnaireRequest>,
) -> ActixResult<HttpResponse> {
    QUESTIONNAIRE_SERVICE
        .update_questionnaire(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_questionnaire(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUESTIONNAIRE_SERVICE.delete_questionnaire(id.0, &req).await
}

pub async fn submit_response(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SubmitResponseRequest>,
) -> ActixResult<HttpResponse> {
    QUESTIONNAIRE_SERVICE
        .submit_response(id.0, body.into_inner(), &req)
        .await
}

pub async fn list_responses(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUESTIONNAIRE_SERVICE.list_responses(id.0, &req).await
}

// 配置路由
pub fn configure_questionnaire_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/questionnaires")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_questionnaires).wrap(RequireRole::teacher()))
                    .route(web::post().to(create_questionnaire).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/assigned")
                    .route(web::get().to(list_assigned).wrap(RequireRole::student())),
            )
            .service(
                web::resource("/{id}")
                    // 学生视图在业务层隐藏答案
                    .route(web::get().to(get_questionnaire))
                    .route(web::put().to(update_questionnaire).wrap(RequireRole::teacher()))
                    .route(web::delete().to(delete_questionnaire).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/{id}/responses")
                    .route(web::get().to(list_responses).wrap(RequireRole::teacher()))
                    .route(web::post().to(submit_response).wrap(RequireRole::student())),
            ),
    );
}
