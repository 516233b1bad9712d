pub mod by_indicator;
pub mod student;
pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::{AppConfig, EvaluationConfig};
use crate::models::indicator_evaluations::requests::EvaluateIndicatorRequest;
use crate::models::indicators::requests::PhaseFilterParams;
use crate::storage::Storage;

pub struct IndicatorEvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl IndicatorEvaluationService {
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

    // 学生适用的指标及评价
    pub async fn get_student_evaluations(
        &self,
        student_id: i64,
        query: PhaseFilterParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student::get_student_evaluations(self, student_id, query, request).await
    }

    // 评价某学生的某个指标（存在则覆盖）
    pub async fn evaluate(
        &self,
        indicator_id: i64,
        student_id: i64,
        req: EvaluateIndicatorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::evaluate(self, indicator_id, student_id, req, request).await
    }

    pub async fn list_for_indicator(
        &self,
        indicator_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        by_indicator::list_for_indicator(self, indicator_id, request).await
    }
}
