//! 固定窗口速率限制
//!
//! 计数键为 `前缀:身份:窗口序号`，身份优先取已认证用户，否则取客户端 IP。
//! 超限返回 429 并带 `Retry-After`；放行的响应带 `X-RateLimit-*` 头。
//!
//! ```rust,ignore
//! web::resource("/login")
//!     .wrap(RateLimit::login())
//!     .route(web::post().to(login));
//! ```

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

// 计数在最长窗口结束后自然过期
const MAX_WINDOW_SECS: u64 = 3600;

static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone, Debug)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    scope: &'static str,
}

impl RateLimit {
    pub fn new(scope: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            scope,
        }
    }

    /// 登录：5 次/分钟/IP
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    pub fn file_upload() -> Self {
        Self::new("upload", 10, 60)
    }

    /// 阶段评估会渲染文档并发信，限制为 10 次/分钟/用户
    pub fn evaluation() -> Self {
        Self::new("evaluation", 10, 60)
    }

    fn window_index(&self, now: i64) -> i64 {
        now.div_euclid(self.window_secs as i64)
    }

    /// 当前窗口剩余秒数
    fn seconds_until_reset(&self, now: i64) -> u64 {
        let window = self.window_secs as i64;
        (window - now.rem_euclid(window)) as u64
    }
}

fn client_identity(req: &ServiceRequest) -> String {
    if let Some(user) = req.extensions().get::<User>() {
        return format!("user:{}", user.id);
    }
    // realip_remote_addr 已按 Forwarded / X-Forwarded-For / 对端地址的顺序取值
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .and_then(|addr| parse_ip(addr))
        .unwrap_or_else(|| "unknown".to_string());
    format!("ip:{ip}")
}

/// 只接受合法 IP（可带端口），避免伪造的头部制造无限多的计数键
fn parse_ip(addr: &str) -> Option<String> {
    use std::net::{IpAddr, SocketAddr};
    let addr = addr.trim();
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return Some(ip.to_string());
    }
    addr.parse::<SocketAddr>()
        .ok()
        .map(|socket| socket.ip().to_string())
}

fn too_many_requests(retry_after: u64, limit: u32) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Limit", limit.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please retry later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    rule: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
            let now = chrono::Utc::now().timestamp();
            let key = format!(
                "{}:{}:{}",
                rule.scope,
                client_identity(&req),
                rule.window_index(now)
            );

            let count = COUNTERS
                .entry(key.clone())
                .and_upsert_with(|existing| {
                    let next = existing.map(|entry| entry.into_value()).unwrap_or(0);
                    ready(next.saturating_add(1))
                })
                .await
                .into_value();

            let reset = rule.seconds_until_reset(now);
            if count > rule.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, rule.max_requests
                );
                return Ok(req.into_response(
                    too_many_requests(reset, rule.max_requests).map_into_right_body(),
                ));
            }

            let mut res = srv.call(req).await?;
            let remaining = rule.max_requests - count;
            let headers = res.headers_mut();
            for (name, value) in [
                ("x-ratelimit-limit", rule.max_requests as u64),
                ("x-ratelimit-remaining", remaining as u64),
                ("x-ratelimit-reset", reset),
            ] {
                headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
            }
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    #[::core::prelude::v1::test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(RateLimit::file_upload().scope, "upload");
        assert_eq!(RateLimit::evaluation().max_requests, 10);
    }

    #[::core::prelude::v1::test]
    fn test_window_arithmetic() {
        let rule = RateLimit::new("t", 1, 60);
        assert_eq!(rule.window_index(119), 1);
        assert_eq!(rule.window_index(120), 2);
        assert_eq!(rule.seconds_until_reset(120), 60);
        assert_eq!(rule.seconds_until_reset(179), 1);
        assert_eq!(RateLimit::new("t", 1, 0).window_secs, 1);
    }

    #[::core::prelude::v1::test]
    fn test_parse_ip() {
        assert_eq!(parse_ip("127.0.0.1").as_deref(), Some("127.0.0.1"));
        assert_eq!(parse_ip("10.0.0.2:8080").as_deref(), Some("10.0.0.2"));
        assert_eq!(parse_ip("::1").as_deref(), Some("::1"));
        assert!(parse_ip("not-an-ip").is_none());
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::new("rate_limit_test", 2, 3600))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let request = || {
            test::TestRequest::get()
                .uri("/")
                .peer_addr("10.1.2.3:4000".parse().unwrap())
                .to_request()
        };

        let first = test::call_service(&app, request()).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(
            first.headers().get("x-ratelimit-remaining").unwrap(),
            "1"
        );
        let second = test::call_service(&app, request()).await;
        assert_eq!(second.status(), StatusCode::OK);

        let third = test::call_service(&app, request()).await;
        assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(third.headers().contains_key("retry-after"));
    }
}
