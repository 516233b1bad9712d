//! 成绩

use super::{SeaOrmStorage, page_params};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades, Relation};
use crate::entity::students::Column as StudentColumn;
use crate::errors::{Result, SEIOError};
use crate::models::{
    PaginationInfo,
    grades::{
        entities::Grade,
        requests::{GradeListQuery, NewGrade, PhaseGradeQuery, UpdateGradeRequest},
        responses::GradeListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    pub async fn create_grade_impl(&self, grade: NewGrade) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(grade.student_id),
            teacher_id: Set(grade.teacher_id),
            subject: Set(grade.subject.trim().to_string()),
            phase: Set(grade.phase),
            score: Set(grade.score),
            weight: Set(grade.weight),
            description: Set(grade.description),
            comment: Set(grade.comment),
            questionnaire_id: Set(grade.questionnaire_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("创建成绩失败: {e}")))?;

        Ok(result.into_grade())
    }

    pub async fn get_grade_by_id_impl(&self, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn update_grade_impl(
        &self,
        id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>> {
        let existing = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询成绩失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(score) = update.score {
            model.score = Set(score);
        }
        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(comment) = update.comment {
            model.comment = Set(Some(comment));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("更新成绩失败: {e}")))?;

        Ok(Some(updated.into_grade()))
    }

    pub async fn delete_grade_impl(&self, id: i64) -> Result<bool> {
        let result = Grades::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_grades_with_pagination_impl(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Grades::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(ref subject) = query.subject {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }
        if let Some(phase) = query.phase {
            select = select.filter(Column::Phase.eq(phase));
        }

        select = select
            .order_by_asc(Column::Phase)
            .order_by_asc(Column::Subject)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询成绩总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询成绩页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(GradeListResponse {
            items: items.into_iter().map(|m| m.into_grade()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 某阶段的成绩，按学生、科目、ID 升序
    pub async fn list_phase_grades_impl(&self, query: PhaseGradeQuery) -> Result<Vec<Grade>> {
        let mut select = Grades::find().filter(Column::Phase.eq(query.phase));

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(ref subject) = query.subject {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }
        if let Some(grade_level) = query.grade_level {
            select = select
                .join(JoinType::InnerJoin, Relation::Student.def())
                .filter(StudentColumn::GradeLevel.eq(grade_level));
        }

        let grades = select
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::Subject)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询阶段成绩失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 学生全部成绩
    pub async fn list_student_grades_impl(&self, student_id: i64) -> Result<Vec<Grade>> {
        let grades = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Phase)
            .order_by_asc(Column::Subject)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生成绩失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }
}
