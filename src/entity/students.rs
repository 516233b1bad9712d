//! 学生档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub grade_level: i32,
    pub group_name: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::grades::Entity")]
    Grades,
    #[sea_orm(has_many = "super::improvement_plans::Entity")]
    ImprovementPlans,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl Related<super::improvement_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ImprovementPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        crate::models::students::entities::Student {
            id: self.id,
            user_id: self.user_id,
            grade_level: self.grade_level,
            group_name: self.group_name,
            guardian_name: self.guardian_name,
            guardian_email: self.guardian_email,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }

    pub fn into_student_info(
        self,
        user: super::users::Model,
    ) -> crate::models::students::entities::StudentInfo {
        crate::models::students::entities::StudentInfo {
            id: self.id,
            user_id: self.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            grade_level: self.grade_level,
            group_name: self.group_name,
            guardian_name: self.guardian_name,
            guardian_email: self.guardian_email,
        }
    }
}
