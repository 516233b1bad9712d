use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IndicatorService;
use crate::config::EvaluationConfig;
use crate::models::{ApiResponse, ErrorCode, indicators::requests::CreateIndicatorRequest};
use crate::services::{bad_request, require_teacher, resolve_actor};
use crate::utils::validate::{validate_grade_level, validate_phase, validate_required_text};

pub(crate) const MAX_DESCRIPTION_CHARS: usize = 1000;

/// 指标作用域：student_id 与 grade_level 恰好其一
fn validate_create_request(
    req: &CreateIndicatorRequest,
    rules: &EvaluationConfig,
) -> Result<(), (ErrorCode, String)> {
    validate_required_text("subject", &req.subject, 100)
        .and_then(|_| validate_required_text("description", &req.description, MAX_DESCRIPTION_CHARS))
        .map_err(|msg| (ErrorCode::BadRequest, msg))?;
    validate_phase(req.phase, rules).map_err(|msg| (ErrorCode::PhaseOutOfRange, msg))?;

    match (req.student_id, req.grade_level) {
        (Some(_), Some(_)) => Err((
            ErrorCode::BadRequest,
            "An indicator is either student-specific or global for a grade level, not both"
                .to_string(),
        )),
        (Some(_), None) => Ok(()),
        (None, Some(grade_level)) => {
            validate_grade_level(grade_level).map_err(|msg| (ErrorCode::BadRequest, msg))
        }
        (None, None) => Err((
            ErrorCode::BadRequest,
            "grade_level is required for global indicators".to_string(),
        )),
    }
}

pub async fn create_indicator(
    service: &IndicatorService,
    req: CreateIndicatorRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err((code, msg)) = validate_create_request(&req, service.rules()) {
        return Ok(bad_request(code, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let teacher = match require_teacher(&actor) {
        Ok(teacher) => teacher,
        Err(response) => return Ok(response),
    };

    if let Some(student_id) = req.student_id {
        match storage.get_student_by_id(student_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::StudentNotFound,
                    "Student not found",
                )));
            }
            Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to create indicator")),
        }
    }

    match storage.create_indicator(teacher.id, req).await {
        Ok(indicator) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(indicator, "指标创建成功")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to create indicator")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(grade_level: Option<i32>, student_id: Option<i64>) -> CreateIndicatorRequest {
        CreateIndicatorRequest {
            subject: "Mathematics".into(),
            phase: 2,
            description: "Reads bar charts".into(),
            category: None,
            grade_level,
            student_id,
        }
    }

    #[test]
    fn test_exactly_one_scope() {
        let rules = EvaluationConfig::default();
        assert!(validate_create_request(&request(Some(5), None), &rules).is_ok());
        assert!(validate_create_request(&request(None, Some(3)), &rules).is_ok());
        assert!(validate_create_request(&request(Some(5), Some(3)), &rules).is_err());
        assert!(validate_create_request(&request(None, None), &rules).is_err());
        assert!(validate_create_request(&request(Some(12), None), &rules).is_err());
    }
}
