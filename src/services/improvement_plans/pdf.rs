use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::get::can_view_plan;
use super::notification::PDF_CONTENT_TYPE;
use super::{ImprovementPlanService, load_plan};
use crate::models::ApiResponse;
use crate::services::{forbidden, resolve_actor};

pub async fn plan_pdf(
    service: &ImprovementPlanService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let plan = match load_plan(&storage, id).await {
        Ok(plan) => plan,
        Err(response) => return Ok(response),
    };
    if !can_view_plan(&actor, plan.student_id, plan.teacher_id) {
        return Ok(forbidden("You cannot view this improvement plan"));
    }

    let notifier = service.notifier(request)?;
    match notifier.render(&plan).await {
        Ok(rendered) => Ok(HttpResponse::Ok()
            .content_type(PDF_CONTENT_TYPE)
            .insert_header((
                "Content-Disposition",
                format!("inline; filename=\"{}\"", rendered.file_name),
            ))
            .body(rendered.bytes)),
        Err(e) => Ok(ApiResponse::from_error(&e, "Failed to render improvement plan")),
    }
}
