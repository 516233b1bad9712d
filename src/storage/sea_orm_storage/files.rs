//! 文件存储操作

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Entity as Files};
use crate::entity::improvement_plans::{Column as PlanColumn, Entity as ImprovementPlans};
use crate::entity::recovery_activities::{
    Column as ActivityColumn, Entity as RecoveryActivities, Relation as ActivityRelation,
};
use crate::errors::{Result, SEIOError};
use crate::models::files::entities::{File, NewFile};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 创建文件记录
    pub async fn create_file_impl(&self, file: NewFile) -> Result<File> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            token: Set(file.token),
            original_name: Set(file.original_name),
            stored_name: Set(file.stored_name),
            file_size: Set(file.file_size),
            file_type: Set(file.file_type),
            user_id: Set(file.user_id),
            created_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("保存文件记录失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过 token 获取文件
    pub async fn get_file_by_token_impl(&self, token: &str) -> Result<Option<File>> {
        let result = Files::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }

    pub async fn delete_file_impl(&self, token: &str) -> Result<Option<File>> {
        let Some(existing) = Files::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询文件失败: {e}")))?
        else {
            return Ok(None);
        };

        Files::delete_by_id(token.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("删除文件记录失败: {e}")))?;

        Ok(Some(existing.into_file()))
    }

    /// 文件是否为该学生计划的文档，或其计划中活动的指导材料/附件
    pub async fn is_file_linked_to_student_impl(
        &self,
        token: &str,
        student_id: i64,
    ) -> Result<bool> {
        let plan_documents = ImprovementPlans::find()
            .filter(PlanColumn::StudentId.eq(student_id))
            .filter(PlanColumn::DocumentToken.eq(token))
            .count(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询文件关联失败: {e}")))?;
        if plan_documents > 0 {
            return Ok(true);
        }

        let activity_files = RecoveryActivities::find()
            .join(JoinType::InnerJoin, ActivityRelation::Plan.def())
            .filter(PlanColumn::StudentId.eq(student_id))
            .filter(
                Condition::any()
                    .add(ActivityColumn::GuideToken.eq(token))
                    .add(ActivityColumn::AttachmentToken.eq(token)),
            )
            .count(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询文件关联失败: {e}")))?;

        Ok(activity_files > 0)
    }
}
