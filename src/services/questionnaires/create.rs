use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionnaireService;
use crate::config::EvaluationConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    questionnaires::requests::{CreateQuestionnaireRequest, QuestionInput},
};
use crate::services::{bad_request, require_teacher, resolve_actor};
use crate::utils::validate::{
    validate_grade_level, validate_phase, validate_required_text,
};

pub(crate) const MAX_TITLE_CHARS: usize = 200;
const MAX_QUESTION_CHARS: usize = 1000;
const MAX_OPTION_CHARS: usize = 500;

/// 每题至少两个非空选项，正确答案下标必须落在选项范围内
pub(crate) fn validate_questions(questions: &[QuestionInput]) -> Result<(), String> {
    if questions.is_empty() {
        return Err("A questionnaire needs at least one question".to_string());
    }
    for (index, question) in questions.iter().enumerate() {
        let number = index + 1;
        validate_required_text(&format!("question {number}"), &question.text, MAX_QUESTION_CHARS)?;
        if question.options.len() < 2 {
            return Err(format!("Question {number} needs at least two options"));
        }
        for option in &question.options {
            validate_required_text(&format!("question {number} option"), option, MAX_OPTION_CHARS)?;
        }
        let in_range = usize::try_from(question.correct_option)
            .map(|i| i < question.options.len())
            .unwrap_or(false);
        if !in_range {
            return Err(format!(
                "Question {number}: correct_option must be between 0 and {}",
                question.options.len() - 1
            ));
        }
    }
    Ok(())
}

fn validate_create_request(
    req: &CreateQuestionnaireRequest,
    rules: &EvaluationConfig,
) -> Result<(), (ErrorCode, String)> {
    validate_required_text("title", &req.title, MAX_TITLE_CHARS)
        .and_then(|_| validate_required_text("subject", &req.subject, 100))
        .and_then(|_| validate_grade_level(req.grade_level))
        .map_err(|msg| (ErrorCode::BadRequest, msg))?;
    validate_phase(req.phase, rules).map_err(|msg| (ErrorCode::PhaseOutOfRange, msg))?;
    validate_questions(&req.questions).map_err(|msg| (ErrorCode::BadRequest, msg))
}

pub async fn create_questionnaire(
    service: &QuestionnaireService,
    req: CreateQuestionnaireRequest,
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

    match storage.create_questionnaire(teacher.id, req).await {
        Ok(detail) => {
            tracing::info!(
                "Teacher {} created questionnaire {} with {} questions",
                teacher.id,
                detail.questionnaire.id,
                detail.questions.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(detail, "问卷创建成功")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to create questionnaire")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], correct_option: i32) -> QuestionInput {
        QuestionInput {
            text: "2 + 2 = ?".into(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option,
        }
    }

    #[test]
    fn test_questions_require_two_options() {
        assert!(validate_questions(&[question(&["4", "5"], 0)]).is_ok());
        assert!(validate_questions(&[question(&["4"], 0)]).is_err());
        assert!(validate_questions(&[]).is_err());
    }

    #[test]
    fn test_correct_option_must_be_in_range() {
        assert!(validate_questions(&[question(&["4", "5"], 2)]).is_err());
        assert!(validate_questions(&[question(&["4", "5"], -1)]).is_err());
        assert!(validate_questions(&[question(&["4", " "], 0)]).is_err());
    }

    #[test]
    fn test_phase_is_checked() {
        let req = CreateQuestionnaireRequest {
            title: "Fractions".into(),
            description: None,
            category: None,
            subject: "Mathematics".into(),
            grade_level: 7,
            phase: 5,
            questions: vec![question(&["a", "b"], 1)],
        };
        let (code, _) = validate_create_request(&req, &EvaluationConfig::default()).unwrap_err();
        assert_eq!(code, ErrorCode::PhaseOutOfRange);
    }
}
