//! 成绩计算规则
//!
//! 阶段得分为加权平均 Σ(score·weight) / Σweight，保留两位小数；
//! 得分不低于及格线即为通过。

use std::collections::BTreeMap;

use crate::models::grades::entities::Grade;

/// 保留两位小数（四舍五入）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseScore {
    pub score: f64,
    pub grade_count: usize,
    pub total_weight: f64,
}

/// 计算加权平均分，输入为 (score, weight)
///
/// 没有有效权重时返回 `None`。
pub fn weighted_phase_score<I>(entries: I) -> Option<PhaseScore>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut grade_count = 0;

    for (score, weight) in entries {
        if weight <= 0.0 {
            continue;
        }
        weighted_sum += score * weight;
        total_weight += weight;
        grade_count += 1;
    }

    if grade_count == 0 || total_weight <= 0.0 {
        return None;
    }

    Some(PhaseScore {
        score: round2(weighted_sum / total_weight),
        grade_count,
        total_weight,
    })
}

/// 及格判定：等于及格线视为通过
pub fn is_passing(score: f64, pass_threshold: f64) -> bool {
    score >= pass_threshold
}

/// 问卷得分：正确题数 / 总题数 × 满分
pub fn questionnaire_score(correct: usize, total: usize, max_score: f64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(correct as f64 / total as f64 * max_score)
}

/// 按科目分组计算阶段得分，科目按字母序
pub fn phase_scores_by_subject<'a, I>(grades: I) -> BTreeMap<String, PhaseScore>
where
    I: IntoIterator<Item = &'a Grade>,
{
    let mut grouped: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for grade in grades {
        grouped
            .entry(grade.subject.clone())
            .or_default()
            .push((grade.score, grade.weight));
    }

    grouped
        .into_iter()
        .filter_map(|(subject, entries)| {
            weighted_phase_score(entries).map(|score| (subject, score))
        })
        .collect()
}

/// 按学生、科目分组计算阶段得分，学生按 ID 升序
pub fn phase_scores_by_student(grades: &[Grade]) -> BTreeMap<i64, BTreeMap<String, PhaseScore>> {
    let mut by_student: BTreeMap<i64, Vec<&Grade>> = BTreeMap::new();
    for grade in grades {
        by_student.entry(grade.student_id).or_default().push(grade);
    }
    by_student
        .into_iter()
        .map(|(student_id, grades)| (student_id, phase_scores_by_subject(grades)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn grade(subject: &str, score: f64, weight: f64) -> Grade {
        Grade {
            id: 0,
            student_id: 1,
            teacher_id: 1,
            subject: subject.to_string(),
            phase: 1,
            score,
            weight,
            description: None,
            comment: None,
            questionnaire_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unweighted_mean() {
        let result = weighted_phase_score([(3.0, 1.0), (4.0, 1.0), (5.0, 1.0)]).unwrap();
        assert_eq!(result.score, 4.0);
        assert_eq!(result.grade_count, 3);
    }

    #[test]
    fn test_weighted_mean() {
        // (2·1 + 5·3) / 4 = 4.25
        let result = weighted_phase_score([(2.0, 1.0), (5.0, 3.0)]).unwrap();
        assert_eq!(result.score, 4.25);
        assert_eq!(result.total_weight, 4.0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // 10 / 3 = 3.333...
        let result = weighted_phase_score([(3.0, 1.0), (3.0, 1.0), (4.0, 1.0)]).unwrap();
        assert_eq!(result.score, 3.33);
    }

    #[test]
    fn test_empty_and_zero_weight() {
        assert!(weighted_phase_score(std::iter::empty()).is_none());
        assert!(weighted_phase_score([(4.0, 0.0)]).is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_passing(3.5, 3.5));
        assert!(is_passing(4.8, 3.5));
        assert!(!is_passing(3.49, 3.5));
    }

    #[test]
    fn test_questionnaire_score() {
        assert_eq!(questionnaire_score(3, 4, 5.0), 3.75);
        assert_eq!(questionnaire_score(2, 3, 5.0), 3.33);
        assert_eq!(questionnaire_score(0, 0, 5.0), 0.0);
    }

    #[test]
    fn test_group_by_subject() {
        let grades = vec![
            grade("Science", 2.0, 1.0),
            grade("Mathematics", 4.0, 1.0),
            grade("Science", 3.0, 1.0),
        ];
        let scores = phase_scores_by_subject(&grades);
        let subjects: Vec<_> = scores.keys().cloned().collect();
        assert_eq!(subjects, vec!["Mathematics", "Science"]);
        assert_eq!(scores["Science"].score, 2.5);
        assert_eq!(scores["Science"].grade_count, 2);
    }

    #[test]
    fn test_group_by_student() {
        let mut late = grade("Mathematics", 3.0, 1.0);
        late.student_id = 2;
        let grades = vec![
            late,
            grade("Mathematics", 4.0, 1.0),
            grade("Mathematics", 2.0, 3.0),
            grade("Physics", 5.0, 1.0),
        ];
        let grouped = phase_scores_by_student(&grades);
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(grouped[&1]["Mathematics"].score, 2.5);
        assert_eq!(grouped[&1]["Physics"].score, 5.0);
        assert_eq!(grouped[&2]["Mathematics"].grade_count, 1);
    }
}
