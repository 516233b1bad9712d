use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_grade_level, validate_password_simple, validate_person_name,
    validate_required_text,
};

/// 校验创建请求，返回第一条错误
fn validate_create_request(user_data: &CreateUserRequest) -> Result<(), (ErrorCode, String)> {
    validate_email(&user_data.email)
        .map_err(|msg| (ErrorCode::UserEmailInvalid, msg.to_string()))?;
    validate_person_name(&user_data.first_name)
        .and_then(|_| validate_person_name(&user_data.last_name))
        .map_err(|msg| (ErrorCode::BadRequest, msg.to_string()))?;
    validate_password_simple(&user_data.password)
        .map_err(|msg| (ErrorCode::UserPasswordInvalid, msg))?;

    match user_data.role {
        UserRole::Teacher => {
            let profile = user_data.teacher.as_ref().ok_or((
                ErrorCode::ProfileMissing,
                "Teacher users require a teacher profile".to_string(),
            ))?;
            validate_required_text("subject", &profile.subject, 100)
                .map_err(|msg| (ErrorCode::BadRequest, msg))?;
        }
        UserRole::Student => {
            let profile = user_data.student.as_ref().ok_or((
                ErrorCode::ProfileMissing,
                "Student users require a student profile".to_string(),
            ))?;
            validate_grade_level(profile.grade_level)
                .map_err(|msg| (ErrorCode::BadRequest, msg))?;
            if let Some(email) = profile.guardian_email.as_deref() {
                validate_email(email)
                    .map_err(|msg| (ErrorCode::UserEmailInvalid, format!("guardian_email: {msg}")))?;
            }
        }
        UserRole::Admin => {}
    }
    Ok(())
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.email = user_data.email.trim().to_lowercase();
    if let Err((code, msg)) = validate_create_request(&user_data) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    let storage = service.get_storage(request)?;

    // 邮箱唯一
    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(ApiResponse::from_error(&e, "User creation failed")),
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    match storage.create_user(user_data).await {
        Ok(detail) => {
            info!(
                "Created {} user {} ({})",
                detail.user.role, detail.user.id, detail.user.email
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(detail, "用户创建成功")))
        }
        Err(e) => {
            error!("User creation failed: {}", e);
            Ok(ApiResponse::from_error(&e, "User creation failed"))
        }
    }
}
