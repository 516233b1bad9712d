use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::indicator_evaluations::requests::EvaluateIndicatorRequest;
use crate::models::indicators::requests::{
    CreateIndicatorRequest, IndicatorListParams, PhaseFilterParams, UpdateIndicatorRequest,
};
use crate::services::{IndicatorEvaluationService, IndicatorService};
use crate::utils::{SafeIDI64, SafeIndicatorIdI64, SafeStudentIdI64};

static INDICATOR_SERVICE: Lazy<IndicatorService> = Lazy::new(IndicatorService::new_lazy);
static EVALUATION_SERVICE: Lazy<IndicatorEvaluationService> =
    Lazy::new(IndicatorEvaluationService::new_lazy);

pub async fn list_indicators(
    req: HttpRequest,
    query: web::Query<IndicatorListParams>,
) -> ActixResult<HttpResponse> {
    INDICATOR_SERVICE
        .list_indicators(query.into_inner(), &req)
        .await
}

pub async fn create_indicator(
    req: HttpRequest,
    body: web::Json<CreateIndicatorRequest>,
) -> ActixResult<HttpResponse> {
    INDICATOR_SERVICE
        .create_indicator(body.into_inner(), &req)
        .await
}

pub async fn get_indicator(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INDICATOR_SERVICE.get_indicator(id.0, &req).await
}

pub async fn update_indicator(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateIndicatorRequest>,
) -> ActixResult<HttpResponse> {
    INDICATOR_SERVICE
        .update_indicator(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_indicator(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INDICATOR_SERVICE.delete_indicator(id.0, &req).await
}

pub async fn indicators_for_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<PhaseFilterParams>,
) -> ActixResult<HttpResponse> {
    INDICATOR_SERVICE
        .list_for_student(student_id.0, query.into_inner(), &req)
        .await
}

pub async fn student_evaluations(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<PhaseFilterParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_student_evaluations(student_id.0, query.into_inner(), &req)
        .await
}

pub async fn evaluate_indicator(
    req: HttpRequest,
    indicator_id: SafeIndicatorIdI64,
    student_id: SafeStudentIdI64,
    body: web::Json<EvaluateIndicatorRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .evaluate(indicator_id.0, student_id.0, body.into_inner(), &req)
        .await
}

pub async fn indicator_evaluations(
    req: HttpRequest,
    indicator_id: SafeIndicatorIdI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_for_indicator(indicator_id.0, &req)
        .await
}

// 配置路由
pub fn configure_indicator_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/indicators")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_indicators).wrap(RequireRole::teacher()))
                    .route(web::post().to(create_indicator).wrap(RequireRole::teacher())),
            )
            // 教师或学生本人（业务层校验）
            .service(
                web::resource("/student/{student_id}")
                    .route(web::get().to(indicators_for_student)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_indicator).wrap(RequireRole::teacher()))
                    .route(web::put().to(update_indicator).wrap(RequireRole::teacher()))
                    .route(web::delete().to(delete_indicator).wrap(RequireRole::teacher())),
            ),
    );
}

pub fn configure_indicator_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/indicator-evaluation")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/student/{student_id}")
                    .route(web::get().to(student_evaluations)),
            )
            .service(
                web::resource("/indicator/{indicator_id}")
                    .route(web::get().to(indicator_evaluations).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/{indicator_id}/student/{student_id}")
                    .route(web::put().to(evaluate_indicator).wrap(RequireRole::teacher())),
            ),
    );
}
