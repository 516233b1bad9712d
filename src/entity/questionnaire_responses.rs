//! 问卷作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questionnaire_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub questionnaire_id: i64,
    pub student_id: i64,
    /// JSON 整数数组
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    pub correct_count: i32,
    pub total_questions: i32,
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    pub submitted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::questionnaires::Entity",
        from = "Column::QuestionnaireId",
        to = "super::questionnaires::Column::Id"
    )]
    Questionnaire,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::questionnaires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questionnaire.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_response(self) -> crate::models::questionnaires::entities::QuestionnaireResponse {
        crate::models::questionnaires::entities::QuestionnaireResponse {
            id: self.id,
            questionnaire_id: self.questionnaire_id,
            student_id: self.student_id,
            answers: serde_json::from_str(&self.answers).unwrap_or_default(),
            correct_count: self.correct_count,
            total_questions: self.total_questions,
            score: self.score,
            submitted_at: super::to_datetime(self.submitted_at),
        }
    }
}
