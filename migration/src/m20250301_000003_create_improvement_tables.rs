use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Students, Teachers};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 改进计划表
        manager
            .create_table(
                Table::create()
                    .table(ImprovementPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImprovementPlans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ImprovementPlans::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ImprovementPlans::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ImprovementPlans::Subject).string().not_null())
                    .col(ColumnDef::new(ImprovementPlans::Phase).integer().not_null())
                    .col(ColumnDef::new(ImprovementPlans::Title).string().not_null())
                    .col(ColumnDef::new(ImprovementPlans::Description).text().null())
                    .col(
                        ColumnDef::new(ImprovementPlans::FailedIndicators)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ImprovementPlans::PhaseScore).double().null())
                    .col(ColumnDef::new(ImprovementPlans::Status).string().not_null())
                    .col(ColumnDef::new(ImprovementPlans::Deadline).big_integer().null())
                    .col(ColumnDef::new(ImprovementPlans::TeacherNotes).text().null())
                    .col(ColumnDef::new(ImprovementPlans::DocumentToken).string().null())
                    .col(
                        ColumnDef::new(ImprovementPlans::EmailSentAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ImprovementPlans::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ImprovementPlans::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ImprovementPlans::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ImprovementPlans::Table, ImprovementPlans::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ImprovementPlans::Table, ImprovementPlans::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 补救活动表
        manager
            .create_table(
                Table::create()
                    .table(RecoveryActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecoveryActivities::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecoveryActivities::PlanId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecoveryActivities::Title).string().not_null())
                    .col(ColumnDef::new(RecoveryActivities::Description).text().null())
                    .col(ColumnDef::new(RecoveryActivities::IndicatorId).big_integer().null())
                    .col(ColumnDef::new(RecoveryActivities::DueDate).big_integer().null())
                    .col(ColumnDef::new(RecoveryActivities::GuideToken).string().null())
                    .col(ColumnDef::new(RecoveryActivities::Status).string().not_null())
                    .col(ColumnDef::new(RecoveryActivities::ResponseText).text().null())
                    .col(
                        ColumnDef::new(RecoveryActivities::AttachmentToken)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(RecoveryActivities::Feedback).text().null())
                    .col(ColumnDef::new(RecoveryActivities::Score).double().null())
                    .col(
                        ColumnDef::new(RecoveryActivities::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RecoveryActivities::ReviewedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RecoveryActivities::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecoveryActivities::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RecoveryActivities::Table, RecoveryActivities::PlanId)
                            .to(ImprovementPlans::Table, ImprovementPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个 (学生, 教师, 科目, 阶段) 最多一个计划
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_improvement_plans_key")
                    .table(ImprovementPlans::Table)
                    .col(ImprovementPlans::StudentId)
                    .col(ImprovementPlans::TeacherId)
                    .col(ImprovementPlans::Subject)
                    .col(ImprovementPlans::Phase)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_recovery_activities_plan_id")
                    .table(RecoveryActivities::Table)
                    .col(RecoveryActivities::PlanId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecoveryActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ImprovementPlans::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ImprovementPlans {
    #[sea_orm(iden = "improvement_plans")]
    Table,
    Id,
    StudentId,
    TeacherId,
    Subject,
    Phase,
    Title,
    Description,
    FailedIndicators,
    PhaseScore,
    Status,
    Deadline,
    TeacherNotes,
    DocumentToken,
    EmailSentAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RecoveryActivities {
    #[sea_orm(iden = "recovery_activities")]
    Table,
    Id,
    PlanId,
    Title,
    Description,
    IndicatorId,
    DueDate,
    GuideToken,
    Status,
    ResponseText,
    AttachmentToken,
    Feedback,
    Score,
    SubmittedAt,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}
