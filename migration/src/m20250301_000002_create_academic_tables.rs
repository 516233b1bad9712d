use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Students, Teachers};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 问卷表
        manager
            .create_table(
                Table::create()
                    .table(Questionnaires::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questionnaires::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Questionnaires::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questionnaires::Title).string().not_null())
                    .col(ColumnDef::new(Questionnaires::Description).text().null())
                    .col(ColumnDef::new(Questionnaires::Category).string().null())
                    .col(ColumnDef::new(Questionnaires::Subject).string().not_null())
                    .col(
                        ColumnDef::new(Questionnaires::GradeLevel)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questionnaires::Phase).integer().not_null())
                    .col(
                        ColumnDef::new(Questionnaires::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Questionnaires::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questionnaires::Table, Questionnaires::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 问题表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Questions::QuestionnaireId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questions::Position).integer().not_null())
                    .col(ColumnDef::new(Questions::Text).text().not_null())
                    .col(ColumnDef::new(Questions::Options).text().not_null())
                    .col(ColumnDef::new(Questions::CorrectOption).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::QuestionnaireId)
                            .to(Questionnaires::Table, Questionnaires::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 问卷作答表
        manager
            .create_table(
                Table::create()
                    .table(QuestionnaireResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionnaireResponses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireResponses::QuestionnaireId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireResponses::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireResponses::Answers)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireResponses::CorrectCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireResponses::TotalQuestions)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireResponses::Score)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireResponses::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                QuestionnaireResponses::Table,
                                QuestionnaireResponses::QuestionnaireId,
                            )
                            .to(Questionnaires::Table, Questionnaires::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                QuestionnaireResponses::Table,
                                QuestionnaireResponses::StudentId,
                            )
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 指标表：grade_level 与 student_id 二选一
        manager
            .create_table(
                Table::create()
                    .table(Indicators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Indicators::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Indicators::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Indicators::Subject).string().not_null())
                    .col(ColumnDef::new(Indicators::Phase).integer().not_null())
                    .col(ColumnDef::new(Indicators::Description).text().not_null())
                    .col(ColumnDef::new(Indicators::Category).string().null())
                    .col(ColumnDef::new(Indicators::GradeLevel).integer().null())
                    .col(ColumnDef::new(Indicators::StudentId).big_integer().null())
                    .col(ColumnDef::new(Indicators::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Indicators::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Indicators::Table, Indicators::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Indicators::Table, Indicators::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 指标评价表
        manager
            .create_table(
                Table::create()
                    .table(IndicatorEvaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IndicatorEvaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IndicatorEvaluations::IndicatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IndicatorEvaluations::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IndicatorEvaluations::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IndicatorEvaluations::Achieved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(IndicatorEvaluations::Score).double().null())
                    .col(ColumnDef::new(IndicatorEvaluations::Comment).text().null())
                    .col(
                        ColumnDef::new(IndicatorEvaluations::EvaluatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IndicatorEvaluations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(IndicatorEvaluations::Table, IndicatorEvaluations::IndicatorId)
                            .to(Indicators::Table, Indicators::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(IndicatorEvaluations::Table, IndicatorEvaluations::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 成绩表：每行为某阶段的一次评分
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::Subject).string().not_null())
                    .col(ColumnDef::new(Grades::Phase).integer().not_null())
                    .col(ColumnDef::new(Grades::Score).double().not_null())
                    .col(
                        ColumnDef::new(Grades::Weight)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Grades::Description).string().null())
                    .col(ColumnDef::new(Grades::Comment).text().null())
                    .col(ColumnDef::new(Grades::QuestionnaireId).big_integer().null())
                    .col(ColumnDef::new(Grades::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束与索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_questionnaire_responses_student")
                    .table(QuestionnaireResponses::Table)
                    .col(QuestionnaireResponses::QuestionnaireId)
                    .col(QuestionnaireResponses::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_indicator_evaluations_student")
                    .table(IndicatorEvaluations::Table)
                    .col(IndicatorEvaluations::IndicatorId)
                    .col(IndicatorEvaluations::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grades_teacher_phase")
                    .table(Grades::Table)
                    .col(Grades::TeacherId)
                    .col(Grades::Phase)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grades_student_phase")
                    .table(Grades::Table)
                    .col(Grades::StudentId)
                    .col(Grades::Phase)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_indicators_scope")
                    .table(Indicators::Table)
                    .col(Indicators::TeacherId)
                    .col(Indicators::Subject)
                    .col(Indicators::Phase)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IndicatorEvaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Indicators::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuestionnaireResponses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questionnaires::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Questionnaires {
    #[sea_orm(iden = "questionnaires")]
    Table,
    Id,
    TeacherId,
    Title,
    Description,
    Category,
    Subject,
    GradeLevel,
    Phase,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    QuestionnaireId,
    Position,
    Text,
    Options,
    CorrectOption,
}

#[derive(DeriveIden)]
enum QuestionnaireResponses {
    #[sea_orm(iden = "questionnaire_responses")]
    Table,
    Id,
    QuestionnaireId,
    StudentId,
    Answers,
    CorrectCount,
    TotalQuestions,
    Score,
    SubmittedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Indicators {
    #[sea_orm(iden = "indicators")]
    Table,
    Id,
    TeacherId,
    Subject,
    Phase,
    Description,
    Category,
    GradeLevel,
    StudentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum IndicatorEvaluations {
    #[sea_orm(iden = "indicator_evaluations")]
    Table,
    Id,
    IndicatorId,
    StudentId,
    TeacherId,
    Achieved,
    Score,
    Comment,
    EvaluatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    StudentId,
    TeacherId,
    Subject,
    Phase,
    Score,
    Weight,
    Description,
    Comment,
    QuestionnaireId,
    CreatedAt,
    UpdatedAt,
}
