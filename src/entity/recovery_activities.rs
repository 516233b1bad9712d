//! 补救活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recovery_activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub plan_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub indicator_id: Option<i64>,
    pub due_date: Option<i64>,
    pub guide_token: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub response_text: Option<String>,
    pub attachment_token: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    pub submitted_at: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::improvement_plans::Entity",
        from = "Column::PlanId",
        to = "super::improvement_plans::Column::Id"
    )]
    Plan,
}

impl Related<super::improvement_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_activity(self) -> crate::models::activities::entities::RecoveryActivity {
        use crate::models::activities::entities::{ActivityStatus, RecoveryActivity};

        RecoveryActivity {
            id: self.id,
            plan_id: self.plan_id,
            title: self.title,
            description: self.description,
            indicator_id: self.indicator_id,
            due_date: self.due_date.map(super::to_datetime),
            guide_token: self.guide_token,
            status: self
                .status
                .parse::<ActivityStatus>()
                .unwrap_or(ActivityStatus::Pending),
            response_text: self.response_text,
            attachment_token: self.attachment_token,
            feedback: self.feedback,
            score: self.score,
            submitted_at: self.submitted_at.map(super::to_datetime),
            reviewed_at: self.reviewed_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
