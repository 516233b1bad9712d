pub mod create;
pub mod delete;
pub mod list;
pub mod review;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::{AppConfig, EvaluationConfig};
use crate::models::{
    ApiResponse, ErrorCode,
    activities::{
        entities::RecoveryActivity,
        requests::{
            CreateActivityRequest, ReviewActivityRequest, SubmitActivityRequest,
            UpdateActivityRequest,
        },
    },
};
use crate::storage::Storage;

pub struct ActivityService {
    storage: Option<Arc<dyn Storage>>,
}

impl ActivityService {
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

    pub async fn list_activities(
        &self,
        plan_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_activities(self, plan_id, request).await
    }

    pub async fn create_activity(
        &self,
        plan_id: i64,
        req: CreateActivityRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_activity(self, plan_id, req, request).await
    }

    pub async fn update_activity(
        &self,
        plan_id: i64,
        activity_id: i64,
        req: UpdateActivityRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_activity(self, plan_id, activity_id, req, request).await
    }

    pub async fn delete_activity(
        &self,
        plan_id: i64,
        activity_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_activity(self, plan_id, activity_id, request).await
    }

    // 学生提交活动
    pub async fn submit_activity(
        &self,
        plan_id: i64,
        activity_id: i64,
        req: SubmitActivityRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_activity(self, plan_id, activity_id, req, request).await
    }

    // 教师审核活动
    pub async fn review_activity(
        &self,
        plan_id: i64,
        activity_id: i64,
        req: ReviewActivityRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_activity(self, plan_id, activity_id, req, request).await
    }
}

/// 读取属于该计划的活动，不存在或不属于该计划时返回 404 响应
pub(crate) async fn load_activity(
    storage: &Arc<dyn Storage>,
    plan_id: i64,
    activity_id: i64,
) -> Result<RecoveryActivity, HttpResponse> {
    match storage.get_activity_by_id(activity_id).await {
        Ok(Some(activity)) if activity.plan_id == plan_id => Ok(activity),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Recovery activity not found",
        ))),
        Err(e) => Err(ApiResponse::from_error(&e, "Failed to load recovery activity")),
    }
}

/// 校验文件令牌存在
pub(crate) async fn ensure_file_exists(
    storage: &Arc<dyn Storage>,
    token: &str,
) -> Result<crate::models::files::entities::File, HttpResponse> {
    match storage.get_file_by_token(token).await {
        Ok(Some(file)) => Ok(file),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "Referenced file not found",
        ))),
        Err(e) => Err(ApiResponse::from_error(&e, "Failed to load file")),
    }
}
