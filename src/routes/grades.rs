use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::grades::requests::{
    CreateGradeRequest, GradeExportParams, GradeListParams, UpdateGradeRequest,
};
use crate::services::GradeService;
use crate::utils::SafeIDI64;

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_grades(
    req: HttpRequest,
    query: web::Query<GradeListParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(query.into_inner(), &req).await
}

pub async fn create_grade(
    req: HttpRequest,
    body: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.create_grade(body.into_inner(), &req).await
}

pub async fn my_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.my_grades(&req).await
}

pub async fn export_grades(
    req: HttpRequest,
    query: web::Query<GradeExportParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.export_grades(query.into_inner(), &req).await
}

pub async fn update_grade(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .update_grade(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_grade(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.delete_grade(id.0, &req).await
}

// 配置路由
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_grades).wrap(RequireRole::teacher()))
                    .route(web::post().to(create_grade).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/me").route(web::get().to(my_grades).wrap(RequireRole::student())),
            )
            .service(
                web::resource("/export")
                    .route(web::get().to(export_grades).wrap(RequireRole::teacher())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_grade).wrap(RequireRole::teacher()))
                    .route(web::delete().to(delete_grade).wrap(RequireRole::teacher())),
            ),
    );
}
