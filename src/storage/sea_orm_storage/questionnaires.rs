//! 问卷、题目与作答记录

use std::collections::HashMap;

use super::{SeaOrmStorage, page_params, write_error};
use crate::entity::grades::ActiveModel as GradeActiveModel;
use crate::entity::questionnaire_responses::{
    ActiveModel as ResponseActiveModel, Column as ResponseColumn, Entity as Responses,
};
use crate::entity::questionnaires::{ActiveModel, Column, Entity as Questionnaires};
use crate::entity::questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as Questions,
};
use crate::entity::students::Entity as Students;
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, SEIOError};
use crate::models::{
    PaginationInfo,
    grades::requests::NewGrade,
    questionnaires::{
        entities::{Question, Questionnaire, QuestionnaireResponse},
        requests::{
            CreateQuestionnaireRequest, NewQuestionnaireResponse, QuestionInput,
            QuestionnaireListQuery, UpdateQuestionnaireRequest,
        },
        responses::{
            AssignedQuestionnaire, QuestionnaireDetail, QuestionnaireListResponse,
            QuestionnaireResponseView,
        },
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 按顺序写入题目
async fn insert_questions<C: ConnectionTrait>(
    conn: &C,
    questionnaire_id: i64,
    questions: Vec<QuestionInput>,
) -> Result<()> {
    for (position, question) in questions.into_iter().enumerate() {
        let options = serde_json::to_string(&question.options)?;
        QuestionActiveModel {
            questionnaire_id: Set(questionnaire_id),
            position: Set(position as i32),
            text: Set(question.text.trim().to_string()),
            options: Set(options),
            correct_option: Set(question.correct_option),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| SEIOError::database_operation(format!("创建题目失败: {e}")))?;
    }
    Ok(())
}

const DUPLICATE_RESPONSE: &str = "该学生已提交过此问卷";

impl SeaOrmStorage {
    /// 创建问卷及题目
    pub async fn create_questionnaire_impl(
        &self,
        teacher_id: i64,
        req: CreateQuestionnaireRequest,
    ) -> Result<QuestionnaireDetail> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SEIOError::database_operation(format!("开启事务失败: {e}")))?;

        let questionnaire = ActiveModel {
            teacher_id: Set(teacher_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            category: Set(req.category),
            subject: Set(req.subject.trim().to_string()),
            grade_level: Set(req.grade_level),
            phase: Set(req.phase),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SEIOError::database_operation(format!("创建问卷失败: {e}")))?;

        insert_questions(&txn, questionnaire.id, req.questions).await?;

        txn.commit()
            .await
            .map_err(|e| SEIOError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_questionnaire_detail_impl(questionnaire.id)
            .await?
            .ok_or_else(|| SEIOError::not_found("问卷创建后未找到"))
    }

    pub async fn get_questionnaire_by_id_impl(&self, id: i64) -> Result<Option<Questionnaire>> {
        let result = Questionnaires::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询问卷失败: {e}")))?;

        Ok(result.map(|m| m.into_questionnaire()))
    }

    /// 问卷详情（题目按顺序）
    pub async fn get_questionnaire_detail_impl(
        &self,
        id: i64,
    ) -> Result<Option<QuestionnaireDetail>> {
        let Some(questionnaire) = self.get_questionnaire_by_id_impl(id).await? else {
            return Ok(None);
        };

        let questions: Vec<Question> = Questions::find()
            .filter(QuestionColumn::QuestionnaireId.eq(id))
            .order_by_asc(QuestionColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询题目失败: {e}")))?
            .into_iter()
            .map(|m| m.into_question())
            .collect();

        let response_count = self.count_questionnaire_responses_impl(id).await?;

        Ok(Some(QuestionnaireDetail {
            questionnaire,
            questions,
            response_count,
        }))
    }

    /// 分页列出问卷
    pub async fn list_questionnaires_with_pagination_impl(
        &self,
        query: QuestionnaireListQuery,
    ) -> Result<QuestionnaireListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Questionnaires::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(ref subject) = query.subject {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }
        if let Some(grade_level) = query.grade_level {
            select = select.filter(Column::GradeLevel.eq(grade_level));
        }
        if let Some(phase) = query.phase {
            select = select.filter(Column::Phase.eq(phase));
        }
        if let Some(ref category) = query.category {
            select = select.filter(Column::Category.eq(category.trim()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Description.contains(&escaped)),
            );
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询问卷总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询问卷页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询问卷列表失败: {e}")))?;

        Ok(QuestionnaireListResponse {
            items: items.into_iter().map(|m| m.into_questionnaire()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新问卷，questions 存在时删除旧题目并重新写入
    pub async fn update_questionnaire_impl(
        &self,
        id: i64,
        update: UpdateQuestionnaireRequest,
    ) -> Result<Option<QuestionnaireDetail>> {
        let existing = Questionnaires::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询问卷失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SEIOError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(category) = update.category {
            model.category = Set(Some(category));
        }
        if let Some(subject) = update.subject {
            model.subject = Set(subject.trim().to_string());
        }
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(grade_level);
        }
        if let Some(phase) = update.phase {
            model.phase = Set(phase);
        }
        model
            .update(&txn)
            .await
            .map_err(|e| SEIOError::database_operation(format!("更新问卷失败: {e}")))?;

        if let Some(questions) = update.questions {
            Questions::delete_many()
                .filter(QuestionColumn::QuestionnaireId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| SEIOError::database_operation(format!("删除旧题目失败: {e}")))?;
            insert_questions(&txn, id, questions).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SEIOError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_questionnaire_detail_impl(id).await
    }

    /// 删除问卷（题目与作答记录级联删除）
    pub async fn delete_questionnaire_impl(&self, id: i64) -> Result<bool> {
        let result = Questionnaires::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("删除问卷失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_questionnaire_responses_impl(&self, questionnaire_id: i64) -> Result<u64> {
        Responses::find()
            .filter(ResponseColumn::QuestionnaireId.eq(questionnaire_id))
            .count(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("统计作答记录失败: {e}")))
    }

    /// 学生年级的问卷，附带题目数与作答情况
    pub async fn list_assigned_questionnaires_impl(
        &self,
        student_id: i64,
        grade_level: i32,
    ) -> Result<Vec<AssignedQuestionnaire>> {
        let questionnaires = Questionnaires::find()
            .filter(Column::GradeLevel.eq(grade_level))
            .order_by_asc(Column::Phase)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询问卷失败: {e}")))?;

        let ids: Vec<i64> = questionnaires.iter().map(|q| q.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let responses: HashMap<i64, f64> = Responses::find()
            .filter(ResponseColumn::StudentId.eq(student_id))
            .filter(ResponseColumn::QuestionnaireId.is_in(ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询作答记录失败: {e}")))?
            .into_iter()
            .map(|r| (r.questionnaire_id, r.score))
            .collect();

        let mut question_counts: HashMap<i64, u64> = HashMap::new();
        for question in Questions::find()
            .filter(QuestionColumn::QuestionnaireId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询题目失败: {e}")))?
        {
            *question_counts.entry(question.questionnaire_id).or_default() += 1;
        }

        Ok(questionnaires
            .into_iter()
            .map(|q| {
                let score = responses.get(&q.id).copied();
                AssignedQuestionnaire {
                    question_count: question_counts.get(&q.id).copied().unwrap_or(0),
                    answered: score.is_some(),
                    score,
                    questionnaire: q.into_questionnaire(),
                }
            })
            .collect())
    }

    pub async fn get_questionnaire_response_impl(
        &self,
        questionnaire_id: i64,
        student_id: i64,
    ) -> Result<Option<QuestionnaireResponse>> {
        let result = Responses::find()
            .filter(ResponseColumn::QuestionnaireId.eq(questionnaire_id))
            .filter(ResponseColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询作答记录失败: {e}")))?;

        Ok(result.map(|m| m.into_response()))
    }

    /// 写入作答记录及其成绩
    pub async fn submit_questionnaire_response_impl(
        &self,
        response: NewQuestionnaireResponse,
        grade: NewGrade,
    ) -> Result<QuestionnaireResponse> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SEIOError::database_operation(format!("开启事务失败: {e}")))?;

        let duplicate = Responses::find()
            .filter(ResponseColumn::QuestionnaireId.eq(response.questionnaire_id))
            .filter(ResponseColumn::StudentId.eq(response.student_id))
            .count(&txn)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询作答记录失败: {e}")))?;
        if duplicate > 0 {
            return Err(SEIOError::conflict(DUPLICATE_RESPONSE));
        }

        let saved = ResponseActiveModel {
            questionnaire_id: Set(response.questionnaire_id),
            student_id: Set(response.student_id),
            answers: Set(serde_json::to_string(&response.answers)?),
            correct_count: Set(response.correct_count),
            total_questions: Set(response.total_questions),
            score: Set(response.score),
            submitted_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error(e, "保存作答记录失败", || DUPLICATE_RESPONSE.to_string()))?;

        GradeActiveModel {
            student_id: Set(grade.student_id),
            teacher_id: Set(grade.teacher_id),
            subject: Set(grade.subject),
            phase: Set(grade.phase),
            score: Set(grade.score),
            weight: Set(grade.weight),
            description: Set(grade.description),
            comment: Set(grade.comment),
            questionnaire_id: Set(grade.questionnaire_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SEIOError::database_operation(format!("记录问卷成绩失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SEIOError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_response())
    }

    /// 问卷的全部作答记录（附学生姓名）
    pub async fn list_questionnaire_responses_impl(
        &self,
        questionnaire_id: i64,
    ) -> Result<Vec<QuestionnaireResponseView>> {
        let rows = Responses::find()
            .filter(ResponseColumn::QuestionnaireId.eq(questionnaire_id))
            .find_also_related(Students)
            .order_by_asc(ResponseColumn::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询作答记录失败: {e}")))?;

        let user_ids: Vec<i64> = rows
            .iter()
            .filter_map(|(_, student)| student.as_ref().map(|s| s.user_id))
            .collect();
        let names: HashMap<i64, String> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(user_ids))
                .all(&self.db)
                .await
                .map_err(|e| SEIOError::database_operation(format!("查询学生姓名失败: {e}")))?
                .into_iter()
                .map(|u| {
                    let user = u.into_user();
                    (user.id, user.full_name())
                })
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(response, student)| {
                let student_name = student
                    .and_then(|s| names.get(&s.user_id).cloned())
                    .unwrap_or_default();
                QuestionnaireResponseView {
                    response: response.into_response(),
                    student_name,
                }
            })
            .collect())
    }
}
