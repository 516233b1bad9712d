pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod me;
pub mod notification;
pub mod notify;
pub mod pdf;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::{AppConfig, EvaluationConfig};
use crate::models::{
    ApiResponse, ErrorCode,
    activities::requests::NewRecoveryActivity,
    improvement_plans::{
        entities::{FailedIndicator, ImprovementPlan},
        requests::{CreatePlanRequest, PlanListParams, UpdatePlanRequest},
    },
};
use crate::storage::Storage;

pub use notification::PlanNotifier;

pub struct ImprovementPlanService {
    storage: Option<Arc<dyn Storage>>,
}

impl ImprovementPlanService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn rules(&self) -> &EvaluationConfig {
        &AppConfig::get().evaluation
    }

    pub(crate) fn notifier(&self, request: &HttpRequest) -> ActixResult<PlanNotifier> {
        let config = AppConfig::get();
        Ok(PlanNotifier::new(
            self.get_storage(request)?,
            super::mailer_from_request(request)?,
            config.evaluation.clone(),
            config.upload.dir.clone(),
            config.app.system_name.clone(),
        ))
    }

    pub async fn list_plans(
        &self,
        query: PlanListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_plans(self, query, request).await
    }

    // 学生本人的计划
    pub async fn my_plans(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        me::my_plans(self, request).await
    }

    pub async fn create_plan(
        &self,
        req: CreatePlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_plan(self, req, request).await
    }

    pub async fn get_plan(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_plan(self, id, request).await
    }

    pub async fn update_plan(
        &self,
        id: i64,
        req: UpdatePlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_plan(self, id, req, request).await
    }

    pub async fn delete_plan(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_plan(self, id, request).await
    }

    // 实时渲染计划 PDF
    pub async fn plan_pdf(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        pdf::plan_pdf(self, id, request).await
    }

    // 重新发送计划邮件
    pub async fn notify_plan(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        notify::notify_plan(self, id, request).await
    }
}

/// 读取计划，不存在时返回 404 响应
pub(crate) async fn load_plan(
    storage: &Arc<dyn Storage>,
    id: i64,
) -> Result<ImprovementPlan, HttpResponse> {
    match storage.get_improvement_plan_by_id(id).await {
        Ok(Some(plan)) => Ok(plan),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PlanNotFound,
            "Improvement plan not found",
        ))),
        Err(e) => Err(ApiResponse::from_error(&e, "Failed to load improvement plan")),
    }
}

pub(crate) fn default_plan_title(subject: &str, phase: i32) -> String {
    format!("Improvement plan - {subject} - phase {phase}")
}

/// 新计划的初始活动：每个未达成指标一项，没有指标时为一项通用活动
pub(crate) fn seed_activities(
    subject: &str,
    failed: &[FailedIndicator],
    deadline: Option<DateTime<Utc>>,
) -> Vec<NewRecoveryActivity> {
    if failed.is_empty() {
        return vec![NewRecoveryActivity {
            title: format!("Review {subject} phase content"),
            description: Some(
                "Review the phase topics and complete the exercises provided by the teacher."
                    .to_string(),
            ),
            indicator_id: None,
            due_date: deadline,
            guide_token: None,
        }];
    }

    failed
        .iter()
        .map(|indicator| NewRecoveryActivity {
            title: format!("Reinforce: {}", truncate(&indicator.description, 80)),
            description: Some(indicator.description.clone()),
            indicator_id: Some(indicator.indicator_id),
            due_date: deadline,
            guide_token: None,
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_activity_without_indicators() {
        let activities = seed_activities("Physics", &[], None);
        assert_eq!(activities.len(), 1);
        assert!(activities[0].indicator_id.is_none());
        assert!(activities[0].title.contains("Physics"));
    }

    #[test]
    fn test_one_activity_per_failed_indicator() {
        let failed = vec![
            FailedIndicator {
                indicator_id: 4,
                description: "Reads a scientific text".into(),
            },
            FailedIndicator {
                indicator_id: 9,
                description: "x".repeat(200),
            },
        ];
        let deadline = Some(Utc::now());
        let activities = seed_activities("Biology", &failed, deadline);
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].indicator_id, Some(4));
        assert_eq!(activities[1].due_date, deadline);
        assert!(activities[1].title.chars().count() <= "Reinforce: ".len() + 80);
    }
}
