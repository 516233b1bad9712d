use super::{SeaOrmStorage, page_params, write_error};
use crate::entity::students::{ActiveModel as StudentActiveModel, Column as StudentColumn, Entity as Students};
use crate::entity::teachers::{ActiveModel as TeacherActiveModel, Column as TeacherColumn, Entity as Teachers};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SEIOError};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserDetail, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户及其档案
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<UserDetail> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SEIOError::database_operation(format!("开启事务失败: {e}")))?;

        let email = req.email.trim().to_lowercase();
        let model = ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            first_name: Set(req.first_name.trim().to_string()),
            last_name: Set(req.last_name.trim().to_string()),
            phone: Set(req.phone),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = model
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, "创建用户失败", || format!("邮箱 {email} 已被使用")))?;

        let mut detail = UserDetail {
            user: user.clone().into_user(),
            teacher: None,
            student: None,
        };

        match req.role {
            UserRole::Teacher => {
                let profile = req
                    .teacher
                    .ok_or_else(|| SEIOError::validation("教师用户必须提供 teacher 档案"))?;
                let teacher = TeacherActiveModel {
                    user_id: Set(user.id),
                    subject: Set(profile.subject.trim().to_string()),
                    institution: Set(profile.institution),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| SEIOError::database_operation(format!("创建教师档案失败: {e}")))?;
                detail.teacher = Some(teacher.into_teacher());
            }
            UserRole::Student => {
                let profile = req
                    .student
                    .ok_or_else(|| SEIOError::validation("学生用户必须提供 student 档案"))?;
                let student = StudentActiveModel {
                    user_id: Set(user.id),
                    grade_level: Set(profile.grade_level),
                    group_name: Set(profile.group_name),
                    guardian_name: Set(profile.guardian_name),
                    guardian_email: Set(profile.guardian_email),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| SEIOError::database_operation(format!("创建学生档案失败: {e}")))?;
                detail.student = Some(student.into_student());
            }
            UserRole::Admin => {}
        }

        txn.commit()
            .await
            .map_err(|e| SEIOError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(detail)
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户（不区分大小写）
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 获取用户及档案
    pub async fn get_user_detail_impl(&self, id: i64) -> Result<Option<UserDetail>> {
        let Some(user) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };

        let teacher = Teachers::find()
            .filter(TeacherColumn::UserId.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询教师档案失败: {e}")))?;

        let student = Students::find()
            .filter(StudentColumn::UserId.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询学生档案失败: {e}")))?;

        Ok(Some(UserDetail {
            user,
            teacher: teacher.map(|m| m.into_teacher()),
            student: student.map(|m| m.into_student()),
        }))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息（password 已哈希）
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let existing = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询用户失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(email) = update.email {
            model.email = Set(email.trim().to_lowercase());
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name.trim().to_string());
        }

        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name.trim().to_string());
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    /// 删除用户，档案与关联数据由外键级联删除
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}
