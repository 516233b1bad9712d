//! 指标评价

use super::SeaOrmStorage;
use crate::entity::indicator_evaluations::{ActiveModel, Column, Entity as IndicatorEvaluations};
use crate::errors::{Result, SEIOError};
use crate::models::indicator_evaluations::{
    entities::IndicatorEvaluation, requests::UpsertIndicatorEvaluation,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict};

impl SeaOrmStorage {
    /// 写入或覆盖 (指标, 学生) 的评价
    pub async fn upsert_indicator_evaluation_impl(
        &self,
        evaluation: UpsertIndicatorEvaluation,
    ) -> Result<IndicatorEvaluation> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            indicator_id: Set(evaluation.indicator_id),
            student_id: Set(evaluation.student_id),
            teacher_id: Set(evaluation.teacher_id),
            achieved: Set(evaluation.achieved),
            score: Set(evaluation.score),
            comment: Set(evaluation.comment),
            evaluated_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // 唯一键 (indicator_id, student_id) 上冲突时覆盖评价内容，保留首次评价时间
        IndicatorEvaluations::insert(model)
            .on_conflict(
                OnConflict::columns([Column::IndicatorId, Column::StudentId])
                    .update_columns([
                        Column::TeacherId,
                        Column::Achieved,
                        Column::Score,
                        Column::Comment,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("保存指标评价失败: {e}")))?;

        let saved = IndicatorEvaluations::find()
            .filter(Column::IndicatorId.eq(evaluation.indicator_id))
            .filter(Column::StudentId.eq(evaluation.student_id))
            .one(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询指标评价失败: {e}")))?
            .ok_or_else(|| {
                SEIOError::database_operation(format!(
                    "指标 {} 学生 {} 的评价写入后未找到",
                    evaluation.indicator_id, evaluation.student_id
                ))
            })?;

        Ok(saved.into_evaluation())
    }

    /// 学生在给定指标上的评价
    pub async fn list_student_evaluations_impl(
        &self,
        student_id: i64,
        indicator_ids: &[i64],
    ) -> Result<Vec<IndicatorEvaluation>> {
        if indicator_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = IndicatorEvaluations::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::IndicatorId.is_in(indicator_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询指标评价失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_evaluation()).collect())
    }

    pub async fn list_indicator_evaluations_impl(
        &self,
        indicator_id: i64,
    ) -> Result<Vec<IndicatorEvaluation>> {
        let result = IndicatorEvaluations::find()
            .filter(Column::IndicatorId.eq(indicator_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SEIOError::database_operation(format!("查询指标评价失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_evaluation()).collect())
    }
}
