//! 业务数据模型
//!
//! 每个资源一个目录：`entities`（业务实体）、`requests`（HTTP 入参与存储层查询）、
//! `responses`（HTTP 出参）。

pub mod activities;
pub mod auth;
pub mod common;
pub mod files;
pub mod grades;
pub mod improvement_plans;
pub mod indicator_evaluations;
pub mod indicators;
pub mod phase_evaluation;
pub mod questionnaires;
pub mod students;
pub mod teachers;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
