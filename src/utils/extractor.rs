//! 安全的路径参数提取器
//!
//! 从路由参数中读取 ID，非数字或非正数时直接返回 400，处理函数无需重复校验。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(name: &str, raw: Option<&str>) -> actix_web::Error {
    let message = match raw {
        Some(value) => format!("Invalid path parameter '{name}': '{value}'"),
        None => format!("Missing path parameter '{name}'"),
    };
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message.clone()));
    InternalError::from_response(message, response).into()
}

/// 解析正整数 ID
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// 定义一个从指定路由参数读取正整数 ID 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready($crate::utils::extractor::extract_i64(req, $param).map($name))
            }
        }
    };
}

#[doc(hidden)]
pub fn extract_i64(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param);
    raw.and_then(parse_positive_id)
        .ok_or_else(|| bad_path_param(param, raw))
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id");
define_safe_i64_extractor!(SafeIndicatorIdI64, "indicator_id");
define_safe_i64_extractor!(SafeActivityIdI64, "activity_id");

/// 文件下载令牌：仅允许生成格式（字母数字与连字符）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("token");
        let result = match raw {
            Some(token)
                if !token.is_empty()
                    && token.len() <= 64
                    && token
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-') =>
            {
                Ok(SafeFileToken(token.to_string()))
            }
            _ => Err(bad_path_param("token", raw)),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("15"), Some(15));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-3"), None);
        assert_eq!(parse_positive_id("abc"), None);
    }

    #[actix_web::test]
    async fn test_extract_from_match_info() {
        let req = TestRequest::default()
            .param("student_id", "9")
            .to_http_request();
        let id = SafeStudentIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 9);

        let req = TestRequest::default().param("id", "x1").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_file_token_rejects_traversal() {
        let req = TestRequest::default()
            .param("token", "../etc/passwd")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_err());

        let req = TestRequest::default()
            .param("token", "3f2a9c1e-7b1d-4c55-9a0e-2d8f6b4e1a77")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_ok());
    }
}
