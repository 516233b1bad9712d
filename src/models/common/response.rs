use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::SEIOError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 将内部错误映射为 HTTP 响应
    pub fn from_error(err: &SEIOError, context: &str) -> HttpResponse {
        let (status, code) = match err {
            SEIOError::Validation(_) | SEIOError::DateParse(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadRequest)
            }
            SEIOError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            SEIOError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            SEIOError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            SEIOError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            SEIOError::Document(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DocumentRenderFailed,
            ),
            SEIOError::Mail(_) => (StatusCode::BAD_GATEWAY, ErrorCode::MailSendFailed),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            ),
        };
        HttpResponse::build(status).json(Self::error_empty(code, format!("{context}: {err}")))
    }
}
