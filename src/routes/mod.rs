pub mod auth;

pub mod users;

pub mod students;

pub mod questionnaires;

pub mod indicators;

pub mod grades;

pub mod improvement_plans;

pub mod phase_evaluation;

pub mod files;

pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use grades::configure_grade_routes;
pub use improvement_plans::configure_improvement_plan_routes;
pub use indicators::{configure_indicator_evaluation_routes, configure_indicator_routes};
pub use phase_evaluation::configure_phase_evaluation_routes;
pub use questionnaires::configure_questionnaire_routes;
pub use students::{configure_student_routes, configure_teacher_routes};
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_student_routes)
        .configure(configure_teacher_routes)
        .configure(configure_questionnaire_routes)
        .configure(configure_indicator_routes)
        .configure(configure_indicator_evaluation_routes)
        .configure(configure_grade_routes)
        .configure(configure_improvement_plan_routes)
        .configure(configure_phase_evaluation_routes)
        .configure(configure_file_routes);
}
