//! 指标评价实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "indicator_evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub indicator_id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub achieved: bool,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub evaluated_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::indicators::Entity",
        from = "Column::IndicatorId",
        to = "super::indicators::Column::Id"
    )]
    Indicator,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::indicators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Indicator.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(
        self,
    ) -> crate::models::indicator_evaluations::entities::IndicatorEvaluation {
        crate::models::indicator_evaluations::entities::IndicatorEvaluation {
            id: self.id,
            indicator_id: self.indicator_id,
            student_id: self.student_id,
            teacher_id: self.teacher_id,
            achieved: self.achieved,
            score: self.score,
            comment: self.comment,
            evaluated_at: super::to_datetime(self.evaluated_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
