use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::config::EvaluationConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    grades::requests::{CreateGradeRequest, NewGrade},
};
use crate::services::{bad_request, require_teacher, resolve_actor};
use crate::utils::validate::{validate_phase, validate_required_text, validate_score, validate_weight};

pub(crate) const DEFAULT_WEIGHT: f64 = 1.0;

fn validate_create_request(
    req: &CreateGradeRequest,
    rules: &EvaluationConfig,
) -> Result<(), (ErrorCode, String)> {
    validate_required_text("subject", &req.subject, 100)
        .map_err(|msg| (ErrorCode::BadRequest, msg))?;
    validate_phase(req.phase, rules).map_err(|msg| (ErrorCode::PhaseOutOfRange, msg))?;
    validate_score(req.score, rules).map_err(|msg| (ErrorCode::ScoreOutOfRange, msg))?;
    if let Some(weight) = req.weight {
        validate_weight(weight).map_err(|msg| (ErrorCode::BadRequest, msg))?;
    }
    Ok(())
}

pub async fn create_grade(
    service: &GradeService,
    req: CreateGradeRequest,
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

    match storage.get_student_by_id(req.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to record grade")),
    }

    let grade = NewGrade {
        student_id: req.student_id,
        teacher_id: teacher.id,
        subject: req.subject.trim().to_string(),
        phase: req.phase,
        score: req.score,
        weight: req.weight.unwrap_or(DEFAULT_WEIGHT),
        description: req.description,
        comment: req.comment,
        questionnaire_id: None,
    };

    match storage.create_grade(grade).await {
        Ok(grade) => Ok(HttpResponse::Created().json(ApiResponse::success(grade, "成绩录入成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to record grade")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(phase: i32, score: f64, weight: Option<f64>) -> CreateGradeRequest {
        CreateGradeRequest {
            student_id: 1,
            subject: "Mathematics".into(),
            phase,
            score,
            weight,
            description: None,
            comment: None,
        }
    }

    #[test]
    fn test_accepts_boundary_values() {
        let rules = EvaluationConfig::default();
        assert!(validate_create_request(&request(1, 0.0, None), &rules).is_ok());
        assert!(validate_create_request(&request(4, 5.0, Some(2.5)), &rules).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let rules = EvaluationConfig::default();
        let (code, _) = validate_create_request(&request(5, 3.0, None), &rules).unwrap_err();
        assert_eq!(code, ErrorCode::PhaseOutOfRange);
        let (code, _) = validate_create_request(&request(1, 5.5, None), &rules).unwrap_err();
        assert_eq!(code, ErrorCode::ScoreOutOfRange);
        let (code, _) = validate_create_request(&request(1, 3.0, Some(0.0)), &rules).unwrap_err();
        assert_eq!(code, ErrorCode::BadRequest);
    }
}
