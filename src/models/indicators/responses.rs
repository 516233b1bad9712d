use super::entities::Indicator;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/indicator.ts")]
pub struct IndicatorListResponse {
    pub items: Vec<Indicator>,
    pub pagination: PaginationInfo,
}
