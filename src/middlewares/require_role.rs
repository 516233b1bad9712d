//! 角色校验中间件
//!
//! 必须位于 `RequireJWT` 之内：它读取 JWT 中间件放入请求扩展的 `User`。
//! 未认证返回 401，角色不在允许列表中返回 403。
//!
//! ```rust,ignore
//! web::resource("/export")
//!     .route(web::get().to(export_grades).wrap(RequireRole::teacher()))
//! ```

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone, Debug)]
pub struct RequireRole {
    allowed: Vec<UserRole>,
}

impl RequireRole {
    /// 只允许单一角色
    pub fn new(role: &UserRole) -> Self {
        Self::any_of(&[role])
    }

    pub fn any_of(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    pub fn admin() -> Self {
        Self::any_of(UserRole::admin_roles())
    }

    /// 教师或管理员
    pub fn teacher() -> Self {
        Self::any_of(UserRole::teacher_roles())
    }

    pub fn student() -> Self {
        Self::any_of(UserRole::student_roles())
    }

    fn permits(&self, role: &UserRole) -> bool {
        self.allowed.contains(role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    rule: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let rule = self.rule.clone();

        Box::pin(async move {
            let caller = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role.clone()));

            let denied = match caller {
                None => Some((
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Authentication required",
                )),
                Some((id, role)) if !rule.permits(&role) => {
                    info!(
                        "Access denied for user {} (role: {:?}), allowed: {:?}",
                        id, role, rule.allowed
                    );
                    Some((StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied"))
                }
                Some(_) => None,
            };

            match denied {
                Some((status, code, message)) => Ok(req.into_response(
                    create_error_response(status, code, message).map_into_right_body(),
                )),
                None => Ok(srv.call(req).await?.map_into_left_body()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_rule_accepts_admin() {
        let rule = RequireRole::teacher();
        assert!(rule.permits(&UserRole::Teacher));
        assert!(rule.permits(&UserRole::Admin));
        assert!(!rule.permits(&UserRole::Student));
    }

    #[test]
    fn test_single_role_rule() {
        assert!(RequireRole::admin().permits(&UserRole::Admin));
        assert!(!RequireRole::admin().permits(&UserRole::Teacher));
        assert!(RequireRole::student().permits(&UserRole::Student));
        assert!(!RequireRole::student().permits(&UserRole::Admin));
        assert!(!RequireRole::new(&UserRole::Teacher).permits(&UserRole::Admin));
    }
}
