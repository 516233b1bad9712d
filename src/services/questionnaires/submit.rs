use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionnaireService;
use crate::errors::SEIOError;
use crate::models::{
    ApiResponse, ErrorCode,
    grades::requests::NewGrade,
    questionnaires::{
        entities::Question,
        requests::{NewQuestionnaireResponse, SubmitResponseRequest},
    },
};
use crate::services::{bad_request, forbidden, require_student, resolve_actor};
use crate::utils::scoring::questionnaire_score;

/// 统计答对题数；答案数量或下标不合法时返回错误
pub(crate) fn grade_answers(questions: &[Question], answers: &[i32]) -> Result<usize, String> {
    if answers.len() != questions.len() {
        return Err(format!(
            "Expected {} answers, got {}",
            questions.len(),
            answers.len()
        ));
    }

    let mut correct = 0;
    for (index, (question, answer)) in questions.iter().zip(answers).enumerate() {
        let valid = usize::try_from(*answer)
            .map(|i| i < question.options.len())
            .unwrap_or(false);
        if !valid {
            return Err(format!("Answer {} is not a valid option", index + 1));
        }
        if question.correct_option == Some(*answer) {
            correct += 1;
        }
    }
    Ok(correct)
}

pub async fn submit_response(
    service: &QuestionnaireService,
    id: i64,
    req: SubmitResponseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let student = match require_student(&actor) {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let detail = match storage.get_questionnaire_detail(id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::QuestionnaireNotFound,
                "Questionnaire not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to submit response")),
    };

    let questionnaire = &detail.questionnaire;
    if questionnaire.grade_level != student.grade_level {
        return Ok(forbidden("Questionnaire is not assigned to your grade level"));
    }

    let correct = match grade_answers(&detail.questions, &req.answers) {
        Ok(correct) => correct,
        Err(msg) => return Ok(bad_request(ErrorCode::AnswerCountMismatch, msg)),
    };
    let total = detail.questions.len();
    let score = questionnaire_score(correct, total, service.rules().max_score);

    let response = NewQuestionnaireResponse {
        questionnaire_id: questionnaire.id,
        student_id: student.id,
        answers: req.answers,
        correct_count: correct as i32,
        total_questions: total as i32,
        score,
    };
    let grade = NewGrade {
        student_id: student.id,
        teacher_id: questionnaire.teacher_id,
        subject: questionnaire.subject.clone(),
        phase: questionnaire.phase,
        score,
        weight: 1.0,
        description: Some(format!("Questionnaire: {}", questionnaire.title)),
        comment: None,
        questionnaire_id: Some(questionnaire.id),
    };

    match storage.submit_questionnaire_response(response, grade).await {
        Ok(saved) => {
            tracing::info!(
                "Student {} answered questionnaire {}: {}/{} correct, score {}",
                student.id,
                questionnaire.id,
                correct,
                total,
                saved.score
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(saved, "作答提交成功")))
        }
        Err(SEIOError::Conflict(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::QuestionnaireAlreadyAnswered,
            "You have already answered this questionnaire",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to submit response")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_option: i32) -> Question {
        Question {
            id: 1,
            questionnaire_id: 1,
            position: 0,
            text: "?".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_option: Some(correct_option),
        }
    }

    #[test]
    fn test_grade_answers_counts_correct() {
        let questions = vec![question(0), question(1), question(2), question(0)];
        assert_eq!(grade_answers(&questions, &[0, 1, 0, 2]), Ok(2));
        assert_eq!(
            questionnaire_score(2, 4, 5.0),
            2.5,
        );
    }

    #[test]
    fn test_grade_answers_rejects_wrong_length() {
        let questions = vec![question(0), question(1)];
        assert!(grade_answers(&questions, &[0]).is_err());
        assert!(grade_answers(&questions, &[0, 1, 2]).is_err());
    }

    #[test]
    fn test_grade_answers_rejects_unknown_option() {
        let questions = vec![question(0)];
        assert!(grade_answers(&questions, &[3]).is_err());
        assert!(grade_answers(&questions, &[-1]).is_err());
    }
}
