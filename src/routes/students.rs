use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::students::requests::StudentListParams;
use crate::models::users::entities::UserRole;
use crate::services::{StudentService, TeacherService};
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);
static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(id.0, &req).await
}

pub async fn my_progress(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_progress(None, &req).await
}

pub async fn student_progress(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_progress(Some(id.0), &req).await
}

pub async fn teacher_me(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_me(&req).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_students).wrap(RequireRole::teacher())),
            )
            // 学生查看自己的进度
            .service(
                web::resource("/me/progress")
                    .route(web::get().to(my_progress).wrap(RequireRole::student())),
            )
            // 教师或学生本人（业务层校验）
            .service(web::resource("/{id}").route(web::get().to(get_student)))
            .service(
                web::resource("/{id}/progress")
                    .route(web::get().to(student_progress).wrap(RequireRole::teacher())),
            ),
    );
}

pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teachers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/me").route(
                    web::get()
                        .to(teacher_me)
                        .wrap(RequireRole::new(&UserRole::Teacher)),
                ),
            ),
    );
}
