use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::{ActivityService, ensure_file_exists, load_activity};
use crate::models::{
    ApiResponse, ErrorCode,
    activities::{
        entities::ActivityStatus,
        requests::{RecoveryActivityPatch, SubmitActivityRequest},
    },
    improvement_plans::{entities::PlanStatus, requests::ImprovementPlanPatch},
};
use crate::services::improvement_plans::load_plan;
use crate::services::{bad_request, forbidden, require_student, resolve_actor};

/// 去除空白内容，文本与附件至少保留其一
pub(crate) fn normalize_submission(
    req: SubmitActivityRequest,
) -> Result<(Option<String>, Option<String>), &'static str> {
    let text = req
        .response_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let attachment = req
        .attachment_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if text.is_none() && attachment.is_none() {
        return Err("Either response_text or attachment_token is required");
    }
    Ok((text, attachment))
}

pub async fn submit_activity(
    service: &ActivityService,
    plan_id: i64,
    activity_id: i64,
    req: SubmitActivityRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (response_text, attachment_token) = match normalize_submission(req) {
        Ok(parts) => parts,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };
    let student = match require_student(&actor) {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let plan = match load_plan(&storage, plan_id).await {
        Ok(plan) => plan,
        Err(response) => return Ok(response),
    };
    if plan.student_id != student.id {
        return Ok(forbidden("This improvement plan belongs to another student"));
    }
    if !plan.status.is_open() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ActivityStateInvalid,
            format!("Improvement plan is already {}", plan.status),
        )));
    }

    let activity = match load_activity(&storage, plan.id, activity_id).await {
        Ok(activity) => activity,
        Err(response) => return Ok(response),
    };
    if !activity.status.accepts_submission() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ActivityStateInvalid,
            format!("Activity cannot be submitted while {}", activity.status),
        )));
    }

    if let Some(token) = &attachment_token {
        match ensure_file_exists(&storage, token).await {
            Ok(file) if file.user_id == actor.user().id => {}
            Ok(_) => return Ok(forbidden("Attachments must be uploaded by the student")),
            Err(response) => return Ok(response),
        }
    }

    let patch = RecoveryActivityPatch {
        status: Some(ActivityStatus::Submitted),
        response_text,
        attachment_token,
        submitted_at: Some(Utc::now()),
        ..Default::default()
    };
    let activity = match storage.update_activity(activity.id, patch).await {
        Ok(Some(activity)) => activity,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ActivityNotFound,
                "Recovery activity not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to submit recovery activity")),
    };

    // 首次提交后计划进入进行中
    if plan.status == PlanStatus::Pending
        && let Err(e) = storage
            .update_improvement_plan(
                plan.id,
                ImprovementPlanPatch {
                    status: Some(PlanStatus::InProgress),
                    ..Default::default()
                },
            )
            .await
    {
        return Ok(ApiResponse::from_error(&e, "Failed to update improvement plan"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(activity, "活动已提交")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_text_or_attachment() {
        let empty = SubmitActivityRequest {
            response_text: Some("   ".into()),
            attachment_token: None,
        };
        assert!(normalize_submission(empty).is_err());

        let text_only = SubmitActivityRequest {
            response_text: Some(" solved the exercises ".into()),
            attachment_token: Some(String::new()),
        };
        let (text, attachment) = normalize_submission(text_only).unwrap();
        assert_eq!(text.as_deref(), Some("solved the exercises"));
        assert!(attachment.is_none());
    }
}
