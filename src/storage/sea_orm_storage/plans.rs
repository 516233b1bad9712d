//! 改进计划

use super::{SeaOrmStorage, page_params, write_error};
use crate::entity::improvement_plans::{ActiveModel, Column, Entity as ImprovementPlans};
use crate::entity::recovery_activities::ActiveModel as ActivityActiveModel;
use crate::errors::{Result, SEIOError};
use crate::models::{
    PaginationInfo,
    activities::{entities::ActivityStatus, requests::NewRecoveryActivity},
    improvement_plans::{
        entities::{ImprovementPlan, PlanStatus},
        requests::{ImprovementPlanPatch, NewImprovementPlan, PlanListQuery},
        responses::PlanListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建计划及初始活动
    pub async fn create_improvement_plan_impl(
        &self,
        plan: NewImprovementPlan,
        activities: Vec<NewRecoveryActivity>,
    ) -> Result<ImprovementPlan> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SEIOError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = ImprovementPlans::find()
            .filter(Column::StudentId.eq(plan.student_id))
            .filter(Column::TeacherId.eq(plan.teacher_id))
            .filter(Column::Subject.eq(plan.subject.as_str()))
            .filter(Column::Phase.eq(plan.phase))
            .count(&txn)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询改进计划失败: {e}")))?;
        let duplicate = || {
            format!(
                "学生 {} 在 {} 第 {} 阶段已有改进计划",
                plan.student_id, plan.subject, plan.phase
            )
        };
        if existing > 0 {
            return Err(SEIOError::conflict(duplicate()));
        }

        let saved = ActiveModel {
            student_id: Set(plan.student_id),
            teacher_id: Set(plan.teacher_id),
            subject: Set(plan.subject.clone()),
            phase: Set(plan.phase),
            title: Set(plan.title),
            description: Set(plan.description),
            failed_indicators: Set(serde_json::to_string(&plan.failed_indicators)?),
            phase_score: Set(plan.phase_score),
            status: Set(PlanStatus::Pending.to_string()),
            deadline: Set(plan.deadline.map(|d| d.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error(e, "创建改进计划失败", duplicate))?;

        for activity in activities {
            ActivityActiveModel {
                plan_id: Set(saved.id),
                title: Set(activity.title),
                description: Set(activity.description),
                indicator_id: Set(activity.indicator_id),
                due_date: Set(activity.due_date.map(|d| d.timestamp())),
                guide_token: Set(activity.guide_token),
                status: Set(ActivityStatus::Pending.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SEIOError::database_operation(format!("创建补救活动失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SEIOError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_plan())
    }

    pub async fn get_improvement_plan_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<ImprovementPlan>> {
        let result = ImprovementPlans::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询改进计划失败: {e}")))?;

        Ok(result.map(|m| m.into_plan()))
    }

    /// 按 (学生, 教师, 科目, 阶段) 查找计划
    pub async fn find_improvement_plan_impl(
        &self,
        student_id: i64,
        teacher_id: i64,
        subject: &str,
        phase: i32,
    ) -> Result<Option<ImprovementPlan>> {
        let result = ImprovementPlans::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::Subject.eq(subject))
            .filter(Column::Phase.eq(phase))
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询改进计划失败: {e}")))?;

        Ok(result.map(|m| m.into_plan()))
    }

    pub async fn list_improvement_plans_with_pagination_impl(
        &self,
        query: PlanListQuery,
    ) -> Result<PlanListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = ImprovementPlans::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(phase) = query.phase {
            select = select.filter(Column::Phase.eq(phase));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(ref subject) = query.subject {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询改进计划总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询改进计划页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询改进计划列表失败: {e}")))?;

        Ok(PlanListResponse {
            items: items.into_iter().map(|m| m.into_plan()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn list_student_plans_impl(&self, student_id: i64) -> Result<Vec<ImprovementPlan>> {
        let plans = ImprovementPlans::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Phase)
            .order_by_asc(Column::Subject)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生改进计划失败: {e}")))?;

        Ok(plans.into_iter().map(|m| m.into_plan()).collect())
    }

    /// 局部更新计划
    ///
    /// 状态变为 completed 时写入 completed_at，变为其他状态时清空。
    pub async fn update_improvement_plan_impl(
        &self,
        id: i64,
        patch: ImprovementPlanPatch,
    ) -> Result<Option<ImprovementPlan>> {
        let existing = ImprovementPlans::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询改进计划失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let previous_status = existing.status.clone();
        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now);

        if let Some(title) = patch.title {
            model.title = Set(title);
        }
        if let Some(description) = patch.description {
            model.description = Set(Some(description));
        }
        if let Some(deadline) = patch.deadline {
            model.deadline = Set(Some(deadline.timestamp()));
        }
        if let Some(teacher_notes) = patch.teacher_notes {
            model.teacher_notes = Set(Some(teacher_notes));
        }
        if let Some(phase_score) = patch.phase_score {
            model.phase_score = Set(Some(phase_score));
        }
        if let Some(failed_indicators) = patch.failed_indicators {
            model.failed_indicators = Set(serde_json::to_string(&failed_indicators)?);
        }
        if let Some(document_token) = patch.document_token {
            model.document_token = Set(Some(document_token));
        }
        if let Some(email_sent_at) = patch.email_sent_at {
            model.email_sent_at = Set(Some(email_sent_at.timestamp()));
        }
        if let Some(status) = patch.status {
            if status == PlanStatus::Completed {
                if previous_status != PlanStatus::Completed.as_str() {
                    model.completed_at = Set(Some(now));
                }
            } else {
                model.completed_at = Set(None);
            }
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("更新改进计划失败: {e}")))?;

        Ok(Some(updated.into_plan()))
    }

    /// 删除计划（活动级联删除）
    pub async fn delete_improvement_plan_impl(&self, id: i64) -> Result<bool> {
        let result = ImprovementPlans::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("删除改进计划失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
