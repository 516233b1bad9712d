//! 预导入模块，方便使用

pub use super::files::{ActiveModel as FileActiveModel, Entity as Files, Model as FileModel};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::improvement_plans::{
    ActiveModel as ImprovementPlanActiveModel, Entity as ImprovementPlans,
    Model as ImprovementPlanModel,
};
pub use super::indicator_evaluations::{
    ActiveModel as IndicatorEvaluationActiveModel, Entity as IndicatorEvaluations,
    Model as IndicatorEvaluationModel,
};
pub use super::indicators::{
    ActiveModel as IndicatorActiveModel, Entity as Indicators, Model as IndicatorModel,
};
pub use super::questionnaire_responses::{
    ActiveModel as QuestionnaireResponseActiveModel, Entity as QuestionnaireResponses,
    Model as QuestionnaireResponseModel,
};
pub use super::questionnaires::{
    ActiveModel as QuestionnaireActiveModel, Entity as Questionnaires, Model as QuestionnaireModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::recovery_activities::{
    ActiveModel as RecoveryActivityActiveModel, Entity as RecoveryActivities,
    Model as RecoveryActivityModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
