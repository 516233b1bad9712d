pub mod assigned;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod responses;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::{AppConfig, EvaluationConfig};
use crate::models::questionnaires::requests::{
    CreateQuestionnaireRequest, QuestionnaireListParams, SubmitResponseRequest,
    UpdateQuestionnaireRequest,
};
use crate::storage::Storage;

pub struct QuestionnaireService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionnaireService {
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

    pub async fn list_questionnaires(
        &self,
        query: QuestionnaireListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_questionnaires(self, query, request).await
    }

    pub async fn create_questionnaire(
        &self,
        req: CreateQuestionnaireRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_questionnaire(self, req, request).await
    }

    // 学生视图隐藏正确答案
    pub async fn get_questionnaire(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_questionnaire(self, id, request).await
    }

    pub async fn update_questionnaire(
        &self,
        id: i64,
        req: UpdateQuestionnaireRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_questionnaire(self, id, req, request).await
    }

    pub async fn delete_questionnaire(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_questionnaire(self, id, request).await
    }

    // 分配给当前学生年级的问卷
    pub async fn list_assigned(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        assigned::list_assigned(self, request).await
    }

    pub async fn submit_response(
        &self,
        id: i64,
        req: SubmitResponseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_response(self, id, req, request).await
    }

    pub async fn list_responses(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        responses::list_responses(self, id, request).await
    }
}
