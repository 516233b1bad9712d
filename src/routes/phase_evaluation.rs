use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::phase_evaluation::requests::{
    EvaluatePhaseRequest, EvaluateStudentRequest, PreviewParams,
};
use crate::services::PhaseEvaluationService;
use crate::utils::SafeStudentIdI64;

static PHASE_EVALUATION_SERVICE: Lazy<PhaseEvaluationService> =
    Lazy::new(PhaseEvaluationService::new_lazy);

pub async fn evaluate(
    req: HttpRequest,
    body: web::Json<EvaluatePhaseRequest>,
) -> ActixResult<HttpResponse> {
    PHASE_EVALUATION_SERVICE
        .evaluate(body.into_inner(), &req)
        .await
}

pub async fn preview_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<PreviewParams>,
) -> ActixResult<HttpResponse> {
    PHASE_EVALUATION_SERVICE
        .preview_student(student_id.0, query.into_inner(), &req)
        .await
}

pub async fn evaluate_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    body: web::Json<EvaluateStudentRequest>,
) -> ActixResult<HttpResponse> {
    PHASE_EVALUATION_SERVICE
        .evaluate_student(student_id.0, body.into_inner(), &req)
        .await
}

// 配置路由：教师或管理员
pub fn configure_phase_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/phase-evaluation")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(RequireRole::teacher())
                    .service(
                        web::resource("/evaluate")
                            .wrap(RateLimit::evaluation())
                            .route(web::post().to(evaluate)),
                    )
                    .service(
                        web::resource("/students/{student_id}")
                            .route(web::get().to(preview_student))
                            .route(web::post().to(evaluate_student)),
                    ),
            ),
    );
}
