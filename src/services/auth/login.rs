use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
    users::entities::UserStatus,
};
use crate::utils::jwt;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    let invalid_credentials = || {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Email or password is incorrect",
        ))
    };

    // 1. 根据邮箱获取用户信息
    let user = match storage
        .get_user_by_email(login_request.email.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(invalid_credentials()),
        Err(e) => return Ok(ApiResponse::from_error(&e, "Login failed")),
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(invalid_credentials());
    }

    // 3. 检查账号状态
    if user.status != UserStatus::Active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::UserInactive,
            "User account is not active",
        )));
    }

    // 4. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 5. 生成令牌对
    let remember_days = config.jwt.refresh_token_remember_me_expiry;
    let refresh_ttl = login_request
        .remember_me
        .then(|| chrono::Duration::days(remember_days));
    let token_pair = match user.generate_token_pair(refresh_ttl) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    let detail = match storage.get_user_detail(user.id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Ok(invalid_credentials()),
        Err(e) => return Ok(ApiResponse::from_error(&e, "Login failed")),
    };

    tracing::info!("User {} logged in successfully", user.email);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
        user: detail,
        created_at: chrono::Utc::now(),
    };

    // 6. 创建 refresh token cookie
    let cookie_days = if login_request.remember_me {
        remember_days
    } else {
        config.jwt.refresh_token_expiry
    };
    let refresh_cookie =
        jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, cookie_days);

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
