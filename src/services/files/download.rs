use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::SEIOError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Actor, forbidden, resolve_actor};

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let db_file = match storage.get_file_by_token(&file_token).await {
        Ok(Some(f)) => f,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "File query failed")),
    };

    // 学生只能下载自己上传的文件，或挂在自己计划、活动上的文件
    if let Actor::Student(user, student) = &actor
        && db_file.user_id != user.id
    {
        match storage
            .is_file_linked_to_student(&db_file.token, student.id)
            .await
        {
            Ok(true) => {}
            Ok(false) => return Ok(forbidden("You cannot download this file")),
            Err(e) => return Ok(ApiResponse::from_error(&e, "File query failed")),
        }
    }

    let file_path = Path::new(&AppConfig::get().upload.dir).join(&db_file.stored_name);
    let buf = match tokio::fs::read(&file_path).await {
        Ok(buf) => buf,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("File {} missing on disk: {}", db_file.token, file_path.display());
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File content not found",
            )));
        }
        Err(e) => {
            tracing::error!("{}", SEIOError::file_operation(format!("{e}")));
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "File read failed",
            )));
        }
    };

    let content_type = if db_file.file_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        db_file.file_type.clone()
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                db_file.original_name.replace('"', "")
            ),
        ))
        .body(buf))
}
