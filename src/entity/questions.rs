//! 问卷题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub questionnaire_id: i64,
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    /// JSON 字符串数组
    #[sea_orm(column_type = "Text")]
    pub options: String,
    pub correct_option: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::questionnaires::Entity",
        from = "Column::QuestionnaireId",
        to = "super::questionnaires::Column::Id"
    )]
    Questionnaire,
}

impl Related<super::questionnaires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questionnaire.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::questionnaires::entities::Question {
        crate::models::questionnaires::entities::Question {
            id: self.id,
            questionnaire_id: self.questionnaire_id,
            position: self.position,
            text: self.text,
            options: serde_json::from_str(&self.options).unwrap_or_default(),
            correct_option: Some(self.correct_option),
        }
    }
}
