//! 学习指标

use super::{SeaOrmStorage, page_params};
use crate::entity::indicators::{ActiveModel, Column, Entity as Indicators};
use crate::errors::{Result, SEIOError};
use crate::models::{
    PaginationInfo,
    indicators::{
        entities::Indicator,
        requests::{
            ApplicableIndicatorQuery, CreateIndicatorRequest, IndicatorListQuery,
            UpdateIndicatorRequest,
        },
        responses::IndicatorListResponse,
    },
    students::entities::Student,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建指标；个人指标不记录年级
    pub async fn create_indicator_impl(
        &self,
        teacher_id: i64,
        req: CreateIndicatorRequest,
    ) -> Result<Indicator> {
        let now = chrono::Utc::now().timestamp();
        let grade_level = if req.student_id.is_some() {
            None
        } else {
            req.grade_level
        };

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            subject: Set(req.subject.trim().to_string()),
            phase: Set(req.phase),
            description: Set(req.description.trim().to_string()),
            category: Set(req.category),
            grade_level: Set(grade_level),
            student_id: Set(req.student_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("创建指标失败: {e}")))?;

        Ok(result.into_indicator())
    }

    pub async fn get_indicator_by_id_impl(&self, id: i64) -> Result<Option<Indicator>> {
        let result = Indicators::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询指标失败: {e}")))?;

        Ok(result.map(|m| m.into_indicator()))
    }

    pub async fn list_indicators_with_pagination_impl(
        &self,
        query: IndicatorListQuery,
    ) -> Result<IndicatorListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Indicators::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(ref subject) = query.subject {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }
        if let Some(phase) = query.phase {
            select = select.filter(Column::Phase.eq(phase));
        }
        if let Some(grade_level) = query.grade_level {
            select = select.filter(Column::GradeLevel.eq(grade_level));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        select = select
            .order_by_asc(Column::Subject)
            .order_by_asc(Column::Phase)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询指标总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询指标页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询指标列表失败: {e}")))?;

        Ok(IndicatorListResponse {
            items: items.into_iter().map(|m| m.into_indicator()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_indicator_impl(
        &self,
        id: i64,
        update: UpdateIndicatorRequest,
    ) -> Result<Option<Indicator>> {
        let existing = Indicators::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询指标失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(subject) = update.subject {
            model.subject = Set(subject.trim().to_string());
        }
        if let Some(phase) = update.phase {
            model.phase = Set(phase);
        }
        if let Some(description) = update.description {
            model.description = Set(description.trim().to_string());
        }
        if let Some(category) = update.category {
            model.category = Set(Some(category));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("更新指标失败: {e}")))?;

        Ok(Some(updated.into_indicator()))
    }

    pub async fn delete_indicator_impl(&self, id: i64) -> Result<bool> {
        let result = Indicators::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("删除指标失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 适用于学生的指标（年级全局指标 + 个人指标）
    pub async fn list_applicable_indicators_impl(
        &self,
        student: &Student,
        query: ApplicableIndicatorQuery,
    ) -> Result<Vec<Indicator>> {
        let scope = Condition::any()
            .add(Column::StudentId.eq(student.id))
            .add(
                Condition::all()
                    .add(Column::StudentId.is_null())
                    .add(Column::GradeLevel.eq(student.grade_level)),
            );

        let mut select = Indicators::find().filter(scope);

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(ref subject) = query.subject {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }
        if let Some(phase) = query.phase {
            select = select.filter(Column::Phase.eq(phase));
        }

        let indicators = select
            .order_by_asc(Column::Phase)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询适用指标失败: {e}")))?;

        Ok(indicators.into_iter().map(|m| m.into_indicator()).collect())
    }
}
