use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::{ActivityService, load_activity};
use crate::models::{
    ApiResponse, ErrorCode,
    activities::{
        entities::{ActivityStatus, RecoveryActivity},
        requests::{RecoveryActivityPatch, ReviewActivityRequest},
    },
    improvement_plans::{entities::PlanStatus, requests::ImprovementPlanPatch},
};
use crate::services::improvement_plans::load_plan;
use crate::services::{bad_request, forbidden, resolve_actor};
use crate::utils::validate::validate_score;

/// 计划下所有活动均已通过
pub(crate) fn all_approved(activities: &[RecoveryActivity]) -> bool {
    !activities.is_empty()
        && activities
            .iter()
            .all(|a| a.status == ActivityStatus::Approved)
}

pub async fn review_activity(
    service: &ActivityService,
    plan_id: i64,
    activity_id: i64,
    req: ReviewActivityRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(score) = req.score
        && let Err(msg) = validate_score(score, service.rules())
    {
        return Ok(bad_request(ErrorCode::ScoreOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let plan = match load_plan(&storage, plan_id).await {
        Ok(plan) => plan,
        Err(response) => return Ok(response),
    };
    if !actor.can_manage(plan.teacher_id) {
        return Ok(forbidden("Only the owning teacher can review activities"));
    }

    let activity = match load_activity(&storage, plan.id, activity_id).await {
        Ok(activity) => activity,
        Err(response) => return Ok(response),
    };
    if activity.status != ActivityStatus::Submitted {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ActivityStateInvalid,
            format!("Only submitted activities can be reviewed (current: {})", activity.status),
        )));
    }

    let status = if req.approved {
        ActivityStatus::Approved
    } else {
        ActivityStatus::Rejected
    };
    let patch = RecoveryActivityPatch {
        status: Some(status),
        feedback: req.feedback,
        score: req.score,
        reviewed_at: Some(Utc::now()),
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
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to review recovery activity")),
    };

    // 全部活动通过后计划完成
    if req.approved && plan.status.is_open() {
        let activities = match storage.list_plan_activities(plan.id).await {
            Ok(activities) => activities,
            Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to update improvement plan")),
        };
        if all_approved(&activities) {
            let patch = ImprovementPlanPatch {
                status: Some(PlanStatus::Completed),
                ..Default::default()
            };
            if let Err(e) = storage.update_improvement_plan(plan.id, patch).await {
                return Ok(ApiResponse::from_error(&e, "Failed to update improvement plan"));
            }
            tracing::info!("Improvement plan {} completed: all activities approved", plan.id);
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(activity, "活动审核完成")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(status: ActivityStatus) -> RecoveryActivity {
        RecoveryActivity {
            id: 1,
            plan_id: 1,
            title: "Exercises".into(),
            description: None,
            indicator_id: None,
            due_date: None,
            guide_token: None,
            status,
            response_text: None,
            attachment_token: None,
            feedback: None,
            score: None,
            submitted_at: None,
            reviewed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_all_approved() {
        assert!(!all_approved(&[]));
        assert!(all_approved(&[activity(ActivityStatus::Approved)]));
        assert!(!all_approved(&[
            activity(ActivityStatus::Approved),
            activity(ActivityStatus::Submitted),
        ]));
    }
}
