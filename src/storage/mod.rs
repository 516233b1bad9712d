use std::sync::Arc;

use crate::models::{
    activities::{
        entities::RecoveryActivity,
        requests::{NewRecoveryActivity, RecoveryActivityPatch},
    },
    files::entities::{File, NewFile},
    grades::{
        entities::Grade,
        requests::{GradeListQuery, NewGrade, PhaseGradeQuery, UpdateGradeRequest},
        responses::GradeListResponse,
    },
    improvement_plans::{
        entities::ImprovementPlan,
        requests::{ImprovementPlanPatch, NewImprovementPlan, PlanListQuery},
        responses::PlanListResponse,
    },
    indicator_evaluations::{entities::IndicatorEvaluation, requests::UpsertIndicatorEvaluation},
    indicators::{
        entities::Indicator,
        requests::{
            ApplicableIndicatorQuery, CreateIndicatorRequest, IndicatorListQuery,
            UpdateIndicatorRequest,
        },
        responses::IndicatorListResponse,
    },
    questionnaires::{
        entities::{Questionnaire, QuestionnaireResponse},
        requests::{
            CreateQuestionnaireRequest, NewQuestionnaireResponse, QuestionnaireListQuery,
            UpdateQuestionnaireRequest,
        },
        responses::{
            AssignedQuestionnaire, QuestionnaireDetail, QuestionnaireListResponse,
            QuestionnaireResponseView,
        },
    },
    students::{
        entities::{Student, StudentInfo},
        requests::StudentListQuery,
        responses::StudentListResponse,
    },
    teachers::entities::{Teacher, TeacherInfo},
    users::{
        entities::{User, UserDetail},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户及其档案（密码已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<UserDetail>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 获取用户及其教师/学生档案
    async fn get_user_detail(&self, id: i64) -> Result<Option<UserDetail>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户（级联删除档案）
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 教师与学生档案
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_info(&self, teacher_id: i64) -> Result<Option<TeacherInfo>>;
    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_student_info(&self, student_id: i64) -> Result<Option<StudentInfo>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;

    /// 问卷管理方法
    async fn create_questionnaire(
        &self,
        teacher_id: i64,
        req: CreateQuestionnaireRequest,
    ) -> Result<QuestionnaireDetail>;
    async fn get_questionnaire_by_id(&self, id: i64) -> Result<Option<Questionnaire>>;
    // 问卷及题目（含正确答案）
    async fn get_questionnaire_detail(&self, id: i64) -> Result<Option<QuestionnaireDetail>>;
    async fn list_questionnaires_with_pagination(
        &self,
        query: QuestionnaireListQuery,
    ) -> Result<QuestionnaireListResponse>;
    // questions 存在时整体替换题目
    async fn update_questionnaire(
        &self,
        id: i64,
        update: UpdateQuestionnaireRequest,
    ) -> Result<Option<QuestionnaireDetail>>;
    async fn delete_questionnaire(&self, id: i64) -> Result<bool>;
    async fn count_questionnaire_responses(&self, questionnaire_id: i64) -> Result<u64>;
    // 学生年级对应的问卷及作答情况
    async fn list_assigned_questionnaires(
        &self,
        student_id: i64,
        grade_level: i32,
    ) -> Result<Vec<AssignedQuestionnaire>>;
    async fn get_questionnaire_response(
        &self,
        questionnaire_id: i64,
        student_id: i64,
    ) -> Result<Option<QuestionnaireResponse>>;
    // 在同一事务中写入作答记录与对应成绩，重复作答返回 Conflict
    async fn submit_questionnaire_response(
        &self,
        response: NewQuestionnaireResponse,
        grade: NewGrade,
    ) -> Result<QuestionnaireResponse>;
    async fn list_questionnaire_responses(
        &self,
        questionnaire_id: i64,
    ) -> Result<Vec<QuestionnaireResponseView>>;

    /// 指标管理方法
    async fn create_indicator(
        &self,
        teacher_id: i64,
        req: CreateIndicatorRequest,
    ) -> Result<Indicator>;
    async fn get_indicator_by_id(&self, id: i64) -> Result<Option<Indicator>>;
    async fn list_indicators_with_pagination(
        &self,
        query: IndicatorListQuery,
    ) -> Result<IndicatorListResponse>;
    async fn update_indicator(
        &self,
        id: i64,
        update: UpdateIndicatorRequest,
    ) -> Result<Option<Indicator>>;
    async fn delete_indicator(&self, id: i64) -> Result<bool>;
    // 适用于学生的指标：其年级的全局指标 + 其个人指标
    async fn list_applicable_indicators(
        &self,
        student: &Student,
        query: ApplicableIndicatorQuery,
    ) -> Result<Vec<Indicator>>;

    /// 指标评价方法
    async fn upsert_indicator_evaluation(
        &self,
        evaluation: UpsertIndicatorEvaluation,
    ) -> Result<IndicatorEvaluation>;
    async fn list_student_evaluations(
        &self,
        student_id: i64,
        indicator_ids: &[i64],
    ) -> Result<Vec<IndicatorEvaluation>>;
    async fn list_indicator_evaluations(
        &self,
        indicator_id: i64,
    ) -> Result<Vec<IndicatorEvaluation>>;

    /// 成绩管理方法
    async fn create_grade(&self, grade: NewGrade) -> Result<Grade>;
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    async fn update_grade(&self, id: i64, update: UpdateGradeRequest) -> Result<Option<Grade>>;
    async fn delete_grade(&self, id: i64) -> Result<bool>;
    async fn list_grades_with_pagination(&self, query: GradeListQuery)
    -> Result<GradeListResponse>;
    // 某阶段的全部成绩（不分页），按学生 ID 升序
    async fn list_phase_grades(&self, query: PhaseGradeQuery) -> Result<Vec<Grade>>;
    async fn list_student_grades(&self, student_id: i64) -> Result<Vec<Grade>>;

    /// 改进计划方法
    // 在同一事务中创建计划及初始活动，已存在同键计划时返回 Conflict
    async fn create_improvement_plan(
        &self,
        plan: NewImprovementPlan,
        activities: Vec<NewRecoveryActivity>,
    ) -> Result<ImprovementPlan>;
    async fn get_improvement_plan_by_id(&self, id: i64) -> Result<Option<ImprovementPlan>>;
    async fn find_improvement_plan(
        &self,
        student_id: i64,
        teacher_id: i64,
        subject: &str,
        phase: i32,
    ) -> Result<Option<ImprovementPlan>>;
    async fn list_improvement_plans_with_pagination(
        &self,
        query: PlanListQuery,
    ) -> Result<PlanListResponse>;
    async fn list_student_plans(&self, student_id: i64) -> Result<Vec<ImprovementPlan>>;
    async fn update_improvement_plan(
        &self,
        id: i64,
        patch: ImprovementPlanPatch,
    ) -> Result<Option<ImprovementPlan>>;
    async fn delete_improvement_plan(&self, id: i64) -> Result<bool>;

    /// 补救活动方法
    async fn create_activity(
        &self,
        plan_id: i64,
        activity: NewRecoveryActivity,
    ) -> Result<RecoveryActivity>;
    async fn get_activity_by_id(&self, id: i64) -> Result<Option<RecoveryActivity>>;
    async fn list_plan_activities(&self, plan_id: i64) -> Result<Vec<RecoveryActivity>>;
    async fn update_activity(
        &self,
        id: i64,
        patch: RecoveryActivityPatch,
    ) -> Result<Option<RecoveryActivity>>;
    async fn delete_activity(&self, id: i64) -> Result<bool>;

    /// 文件管理方法
    async fn create_file(&self, file: NewFile) -> Result<File>;
    // 通过唯一 token 获取文件信息
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;
    // 删除文件记录，返回被删除的记录以便清理磁盘文件
    async fn delete_file(&self, token: &str) -> Result<Option<File>>;
    // 文件是否挂在该学生的计划或活动上
    async fn is_file_linked_to_student(&self, token: &str, student_id: i64) -> Result<bool>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_with_config(config).await?;
    Ok(Arc::new(storage))
}
