//! 教师与学生档案

use super::{SeaOrmStorage, page_params};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::teachers::{Column as TeacherColumn, Entity as Teachers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, SEIOError};
use crate::models::{
    PaginationInfo,
    students::{
        entities::{Student, StudentInfo},
        requests::StudentListQuery,
        responses::StudentListResponse,
    },
    teachers::entities::{Teacher, TeacherInfo},
};
use crate::utils::escape_like_pattern;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(TeacherColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询教师档案失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn get_teacher_info_impl(&self, teacher_id: i64) -> Result<Option<TeacherInfo>> {
        let result = Teachers::find_by_id(teacher_id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(match result {
            Some((teacher, Some(user))) => Some(teacher.into_teacher_info(user)),
            _ => None,
        })
    }

    pub async fn get_student_by_id_impl(&self, student_id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(StudentColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生档案失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_info_impl(&self, student_id: i64) -> Result<Option<StudentInfo>> {
        let result = Students::find_by_id(student_id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(match result {
            Some((student, Some(user))) => Some(student.into_student_info(user)),
            _ => None,
        })
    }

    /// 分页列出学生，按姓氏排序
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Students::find().find_also_related(Users);

        if let Some(grade_level) = query.grade_level {
            select = select.filter(StudentColumn::GradeLevel.eq(grade_level));
        }

        if let Some(ref group_name) = query.group_name
            && !group_name.trim().is_empty()
        {
            select = select.filter(StudentColumn::GroupName.eq(group_name.trim()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(UserColumn::FirstName.contains(&escaped))
                    .add(UserColumn::LastName.contains(&escaped))
                    .add(UserColumn::Email.contains(&escaped)),
            );
        }

        select = select
            .order_by_asc(UserColumn::LastName)
            .order_by_asc(UserColumn::FirstName)
            .order_by_asc(StudentColumn::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生列表失败: {e}")))?;

        let items = rows
            .into_iter()
            .filter_map(|(student, user)| user.map(|u| student.into_student_info(u)))
            .collect();

        Ok(StudentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}
