//! 补救活动

use super::SeaOrmStorage;
use crate::entity::recovery_activities::{ActiveModel, Column, Entity as RecoveryActivities};
use crate::errors::{Result, SEIOError};
use crate::models::activities::{
    entities::{ActivityStatus, RecoveryActivity},
    requests::{NewRecoveryActivity, RecoveryActivityPatch},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_activity_impl(
        &self,
        plan_id: i64,
        activity: NewRecoveryActivity,
    ) -> Result<RecoveryActivity> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            plan_id: Set(plan_id),
            title: Set(activity.title.trim().to_string()),
            description: Set(activity.description),
            indicator_id: Set(activity.indicator_id),
            due_date: Set(activity.due_date.map(|d| d.timestamp())),
            guide_token: Set(activity.guide_token),
            status: Set(ActivityStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("创建补救活动失败: {e}")))?;

        Ok(result.into_activity())
    }

    pub async fn get_activity_by_id_impl(&self, id: i64) -> Result<Option<RecoveryActivity>> {
        let result = RecoveryActivities::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询补救活动失败: {e}")))?;

        Ok(result.map(|m| m.into_activity()))
    }

    pub async fn list_plan_activities_impl(&self, plan_id: i64) -> Result<Vec<RecoveryActivity>> {
        let result = RecoveryActivities::find()
            .filter(Column::PlanId.eq(plan_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询补救活动失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_activity()).collect())
    }

    pub async fn update_activity_impl(
        &self,
        id: i64,
        patch: RecoveryActivityPatch,
    ) -> Result<Option<RecoveryActivity>> {
        let existing = RecoveryActivities::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询补救活动失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(title) = patch.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = patch.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = patch.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }
        if let Some(guide_token) = patch.guide_token {
            model.guide_token = Set(Some(guide_token));
        }
        if let Some(status) = patch.status {
            model.status = Set(status.to_string());
        }
        if let Some(response_text) = patch.response_text {
            model.response_text = Set(Some(response_text));
        }
        if let Some(attachment_token) = patch.attachment_token {
            model.attachment_token = Set(Some(attachment_token));
        }
        if let Some(feedback) = patch.feedback {
            model.feedback = Set(Some(feedback));
        }
        if let Some(score) = patch.score {
            model.score = Set(Some(score));
        }
        if let Some(submitted_at) = patch.submitted_at {
            model.submitted_at = Set(Some(submitted_at.timestamp()));
        }
        if let Some(reviewed_at) = patch.reviewed_at {
            model.reviewed_at = Set(Some(reviewed_at.timestamp()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("更新补救活动失败: {e}")))?;

        Ok(Some(updated.into_activity()))
    }

    pub async fn delete_activity_impl(&self, id: i64) -> Result<bool> {
        let result = RecoveryActivities::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("删除补救活动失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
