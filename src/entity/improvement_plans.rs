//! 改进计划实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "improvement_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub phase: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// JSON 数组：[{indicator_id, description}]
    #[sea_orm(column_type = "Text")]
    pub failed_indicators: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub phase_score: Option<f64>,
    pub status: String,
    pub deadline: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_notes: Option<String>,
    pub document_token: Option<String>,
    pub email_sent_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::recovery_activities::Entity")]
    Activities,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::recovery_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_plan(self) -> crate::models::improvement_plans::entities::ImprovementPlan {
        use crate::models::improvement_plans::entities::{ImprovementPlan, PlanStatus};

        ImprovementPlan {
            id: self.id,
            student_id: self.student_id,
            teacher_id: self.teacher_id,
            subject: self.subject,
            phase: self.phase,
            title: self.title,
            description: self.description,
            failed_indicators: serde_json::from_str(&self.failed_indicators).unwrap_or_default(),
            phase_score: self.phase_score,
            status: self
                .status
                .parse::<PlanStatus>()
                .unwrap_or(PlanStatus::Pending),
            deadline: self.deadline.map(super::to_datetime),
            teacher_notes: self.teacher_notes,
            document_token: self.document_token,
            email_sent_at: self.email_sent_at.map(super::to_datetime),
            completed_at: self.completed_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
