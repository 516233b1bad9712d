pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod student;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::{AppConfig, EvaluationConfig};
use crate::models::indicators::requests::{
    CreateIndicatorRequest, IndicatorListParams, PhaseFilterParams, UpdateIndicatorRequest,
};
use crate::storage::Storage;

pub struct IndicatorService {
    storage: Option<Arc<dyn Storage>>,
}

impl IndicatorService {
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

    pub async fn list_indicators(
        &self,
        query: IndicatorListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_indicators(self, query, request).await
    }

    pub async fn create_indicator(
        &self,
        req: CreateIndicatorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_indicator(self, req, request).await
    }

    pub async fn get_indicator(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_indicator(self, id, request).await
    }

    pub async fn update_indicator(
        &self,
        id: i64,
        req: UpdateIndicatorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_indicator(self, id, req, request).await
    }

    pub async fn delete_indicator(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_indicator(self, id, request).await
    }

    // 适用于某学生的指标
    pub async fn list_for_student(
        &self,
        student_id: i64,
        query: PhaseFilterParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student::list_for_student(self, student_id, query, request).await
    }
}
