use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::activities::requests::{
    CreateActivityRequest, ReviewActivityRequest, SubmitActivityRequest, UpdateActivityRequest,
};
use crate::models::improvement_plans::requests::{
    CreatePlanRequest, PlanListParams, UpdatePlanRequest,
};
use crate::services::{ActivityService, ImprovementPlanService};
use crate::utils::{SafeActivityIdI64, SafeIDI64};

static PLAN_SERVICE: Lazy<ImprovementPlanService> = Lazy::new(ImprovementPlanService::new_lazy);
static ACTIVITY_SERVICE: Lazy<ActivityService> = Lazy::new(ActivityService::new_lazy);

pub async fn list_plans(
    req: HttpRequest,
    query: web::Query<PlanListParams>,
) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.list_plans(query.into_inner(), &req).await
}

pub async fn create_plan(
    req: HttpRequest,
    body: web::Json<CreatePlanRequest>,
) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.create_plan(body.into_inner(), &req).await
}

pub async fn my_plans(req: HttpRequest) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.my_plans(&req).await
}

pub async fn get_plan(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.get_plan(id.0, &req).await
}

pub async fn update_plan(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdatePlanRequest>,
) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.update_plan(id.0, body.into_inner(), &req).await
}

pub async fn delete_plan(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.delete_plan(id.0, &req).await
}

pub async fn plan_pdf(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.plan_pdf(id.0, &req).await
}

pub async fn notify_plan(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.notify_plan(id.0, &req).await
}

pub async fn list_activities(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE.list_activities(id.0, &req).await
}

pub async fn create_activity(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<CreateActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .create_activity(id.0, body.into_inner(), &req)
        .await
}

pub async fn update_activity(
    req: HttpRequest,
    id: SafeIDI64,
    activity_id: SafeActivityIdI64,
    body: web::Json<UpdateActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .update_activity(id.0, activity_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_activity(
    req: HttpRequest,
    id: SafeIDI64,
    activity_id: SafeActivityIdI64,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .delete_activity(id.0, activity_id.0, &req)
        .await
}

pub async fn submit_activity(
    req: HttpRequest,
    id: SafeIDI64,
    activity_id: SafeActivityIdI64,
    body: web::Json<SubmitActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .submit_activity(id.0, activity_id.0, body.into_inner(), &req)
        .await
}

pub async fn review_activity(
    req: HttpRequest,
    id: SafeIDI64,
    activity_id: SafeActivityIdI64,
    body: web::Json<ReviewActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .review_activity(id.0, activity_id.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_improvement_plan_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/improvement-plans")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_plans).wrap(RequireRole::teacher()))
                    .route(web::post().to(create_plan).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/me").route(web::get().to(my_plans).wrap(RequireRole::student())),
            )
            .service(
                web::resource("/{id}")
                    // 所属教师、学生本人或管理员（业务层校验）
                    .route(web::get().to(get_plan))
                    .route(web::put().to(update_plan).wrap(RequireRole::teacher()))
                    .route(web::delete().to(delete_plan).wrap(RequireRole::teacher())),
            )
            .service(web::resource("/{id}/pdf").route(web::get().to(plan_pdf)))
            .service(
                web::resource("/{id}/notify")
                    .route(web::post().to(notify_plan).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/{id}/activities")
                    .route(web::get().to(list_activities))
                    .route(web::post().to(create_activity).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/{id}/activities/{activity_id}")
                    .route(web::put().to(update_activity).wrap(RequireRole::teacher()))
                    .route(web::delete().to(delete_activity).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/{id}/activities/{activity_id}/submit")
                    .route(web::post().to(submit_activity).wrap(RequireRole::student())),
            )
            .service(
                web::resource("/{id}/activities/{activity_id}/review")
                    .route(web::post().to(review_activity).wrap(RequireRole::teacher())),
            ),
    );
}
