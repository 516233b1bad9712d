pub mod create;
pub mod delete;
pub mod export;
pub mod list;
pub mod me;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::{AppConfig, EvaluationConfig};
use crate::models::grades::requests::{
    CreateGradeRequest, GradeExportParams, GradeListParams, UpdateGradeRequest,
};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    pub async fn create_grade(
        &self,
        req: CreateGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grade(self, req, request).await
    }

    pub async fn update_grade(
        &self,
        id: i64,
        req: UpdateGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grade(self, id, req, request).await
    }

    pub async fn delete_grade(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_grade(self, id, request).await
    }

    pub async fn list_grades(
        &self,
        query: GradeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, query, request).await
    }

    // 学生本人的成绩
    pub async fn my_grades(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        me::my_grades(self, request).await
    }

    // 导出阶段成绩报表（XLSX）
    pub async fn export_grades(
        &self,
        query: GradeExportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_grades(self, query, request).await
    }
}
