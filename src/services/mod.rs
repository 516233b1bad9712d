//! 业务逻辑层
//!
//! 每个资源一个目录，每个操作一个文件。处理函数返回 `HttpResponse`，
//! 身份与归属检查在这里完成，存储层只负责读写。

pub mod activities;
pub mod auth;
pub mod files;
pub mod grades;
pub mod improvement_plans;
pub mod indicator_evaluations;
pub mod indicators;
pub mod phase_evaluation;
pub mod questionnaires;
pub mod students;
pub mod teachers;
pub mod users;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::mailer::Mailer;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, students::entities::Student, teachers::entities::Teacher,
    users::entities::User, users::entities::UserRole,
};
use crate::storage::Storage;

pub use activities::ActivityService;
pub use auth::AuthService;
pub use files::FileService;
pub use grades::GradeService;
pub use improvement_plans::ImprovementPlanService;
pub use indicator_evaluations::IndicatorEvaluationService;
pub use indicators::IndicatorService;
pub use phase_evaluation::{PhaseEvaluationService, PhaseEvaluator};
pub use questionnaires::QuestionnaireService;
pub use students::StudentService;
pub use teachers::TeacherService;
pub use users::UserService;

/// 从 app_data 中取出存储
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not found in app data"))
}

/// 从 app_data 中取出邮件后端
pub(crate) fn mailer_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Mailer>> {
    request
        .app_data::<web::Data<Arc<dyn Mailer>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Mailer not found in app data"))
}

/// 当前请求的身份及其档案
#[derive(Debug, Clone)]
pub(crate) enum Actor {
    Admin(User),
    Teacher(User, Teacher),
    Student(User, Student),
}

impl Actor {
    pub fn user(&self) -> &User {
        match self {
            Actor::Admin(user) | Actor::Teacher(user, _) | Actor::Student(user, _) => user,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin(_))
    }

    pub fn teacher(&self) -> Option<&Teacher> {
        match self {
            Actor::Teacher(_, teacher) => Some(teacher),
            _ => None,
        }
    }

    pub fn teacher_id(&self) -> Option<i64> {
        self.teacher().map(|t| t.id)
    }

    pub fn student(&self) -> Option<&Student> {
        match self {
            Actor::Student(_, student) => Some(student),
            _ => None,
        }
    }

    /// 管理员，或资源所属教师
    pub fn can_manage(&self, owner_teacher_id: i64) -> bool {
        match self {
            Actor::Admin(_) => true,
            Actor::Teacher(_, teacher) => teacher.id == owner_teacher_id,
            Actor::Student(..) => false,
        }
    }

    /// 管理员、任意教师，或学生本人
    pub fn can_view_student(&self, student_id: i64) -> bool {
        match self {
            Actor::Admin(_) | Actor::Teacher(..) => true,
            Actor::Student(_, student) => student.id == student_id,
        }
    }
}

/// 解析当前用户及其教师/学生档案
///
/// 未登录返回 401，教师或学生缺少档案返回 403。
pub(crate) async fn resolve_actor(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<Actor, HttpResponse> {
    let user = RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        ))
    })?;

    let profile_missing = |what: &str| {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ProfileMissing,
            format!("Current user has no {what} profile"),
        ))
    };

    match user.role {
        UserRole::Admin => Ok(Actor::Admin(user)),
        UserRole::Teacher => match storage.get_teacher_by_user_id(user.id).await {
            Ok(Some(teacher)) => Ok(Actor::Teacher(user, teacher)),
            Ok(None) => Err(profile_missing("teacher")),
            Err(e) => Err(ApiResponse::from_error(&e, "Failed to load teacher profile")),
        },
        UserRole::Student => match storage.get_student_by_user_id(user.id).await {
            Ok(Some(student)) => Ok(Actor::Student(user, student)),
            Ok(None) => Err(profile_missing("student")),
            Err(e) => Err(ApiResponse::from_error(&e, "Failed to load student profile")),
        },
    }
}

/// 要求当前用户为教师（并返回其档案）
pub(crate) fn require_teacher(actor: &Actor) -> Result<&Teacher, HttpResponse> {
    actor.teacher().ok_or_else(|| {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ProfileMissing,
            "Only teachers can perform this action",
        ))
    })
}

/// 要求当前用户为学生（并返回其档案）
pub(crate) fn require_student(actor: &Actor) -> Result<&Student, HttpResponse> {
    actor.student().ok_or_else(|| {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ProfileMissing,
            "Only students can perform this action",
        ))
    })
}

pub(crate) fn forbidden(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            role,
            status: crate::models::users::entities::UserStatus::Active,
            first_name: "Test".into(),
            last_name: "User".into(),
            phone: None,
            avatar_url: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn teacher(id: i64) -> Teacher {
        Teacher {
            id,
            user_id: id + 10,
            subject: "Mathematics".into(),
            institution: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn student(id: i64) -> Student {
        Student {
            id,
            user_id: id + 20,
            grade_level: 7,
            group_name: None,
            guardian_name: None,
            guardian_email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_manages_everything() {
        let admin = Actor::Admin(user(1, UserRole::Admin));
        assert!(admin.can_manage(99));
        assert!(admin.can_view_student(5));
        assert!(admin.teacher_id().is_none());
    }

    #[test]
    fn test_teacher_manages_own_resources() {
        let actor = Actor::Teacher(user(2, UserRole::Teacher), teacher(3));
        assert!(actor.can_manage(3));
        assert!(!actor.can_manage(4));
        assert!(actor.can_view_student(42));
    }

    #[test]
    fn test_student_sees_only_self() {
        let actor = Actor::Student(user(5, UserRole::Student), student(6));
        assert!(actor.can_view_student(6));
        assert!(!actor.can_view_student(7));
        assert!(!actor.can_manage(1));
        assert!(require_teacher(&actor).is_err());
        assert!(require_student(&actor).is_ok());
    }
}
