//! 阶段成绩报表导出

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::error;

use super::GradeService;
use crate::models::{
    ApiResponse, ErrorCode,
    grades::requests::{GradeExportParams, PhaseGradeQuery},
    students::entities::StudentInfo,
};
use crate::services::{bad_request, resolve_actor};
use crate::utils::scoring::{PhaseScore, is_passing, phase_scores_by_student};
use crate::utils::validate::validate_phase;

/// 报表中的一行：某学生某科目的阶段得分
pub(crate) struct ReportRow {
    pub student: StudentInfo,
    pub subject: String,
    pub score: PhaseScore,
    pub passed: bool,
}

pub async fn export_grades(
    service: &GradeService,
    query: GradeExportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let rules = service.rules();
    if let Err(msg) = validate_phase(query.phase, rules) {
        return Ok(bad_request(ErrorCode::PhaseOutOfRange, msg));
    }

    let storage = service.get_storage(request)?;
    let actor = match resolve_actor(&storage, request).await {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    // 教师只导出自己录入的成绩，管理员导出全部
    let phase_query = PhaseGradeQuery {
        phase: query.phase,
        teacher_id: actor.teacher_id(),
        student_id: None,
        subject: query.subject.clone(),
        grade_level: query.grade_level,
    };

    let grades = match storage.list_phase_grades(phase_query).await {
        Ok(grades) => grades,
        Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to export grades")),
    };

    let mut rows = Vec::new();
    for (student_id, subjects) in phase_scores_by_student(&grades) {
        let student = match storage.get_student_info(student_id).await {
            Ok(Some(student)) => student,
            Ok(None) => continue,
            Err(e) => return Ok(ApiResponse::from_error(&e, "Failed to export grades")),
        };
        for (subject, score) in subjects {
            rows.push(ReportRow {
                student: student.clone(),
                passed: is_passing(score.score, rules.pass_threshold),
                subject,
                score,
            });
        }
    }

    match generate_xlsx(query.phase, rules.pass_threshold, &rows) {
        Ok(buffer) => {
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
            let filename = format!("phase_{}_grades_{timestamp}.xlsx", query.phase);

            Ok(HttpResponse::Ok()
                .content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(buffer))
        }
        Err(e) => {
            error!("Failed to generate grade report: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExportFailed,
                    format!("Failed to generate report: {e}"),
                )),
            )
        }
    }
}

/// 生成 XLSX：第一张表为明细，第二张为汇总
pub(crate) fn generate_xlsx(
    phase: i32,
    pass_threshold: f64,
    rows: &[ReportRow],
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let title_format = Format::new().set_bold().set_font_size(14);
    let score_format = Format::new().set_num_format("0.00");

    let details = workbook.add_worksheet().set_name(format!("Phase {phase}"))?;
    let headers = [
        "Student ID",
        "Name",
        "Email",
        "Grade level",
        "Group",
        "Subject",
        "Grades",
        "Phase score",
        "Result",
    ];
    for (col, header) in headers.iter().enumerate() {
        details.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let r = index as u32 + 1;
        details.write_number(r, 0, row.student.id as f64)?;
        details.write_string(r, 1, row.student.full_name())?;
        details.write_string(r, 2, &row.student.email)?;
        details.write_number(r, 3, row.student.grade_level)?;
        details.write_string(r, 4, row.student.group_name.as_deref().unwrap_or("-"))?;
        details.write_string(r, 5, &row.subject)?;
        details.write_number(r, 6, row.score.grade_count as f64)?;
        details.write_number_with_format(r, 7, row.score.score, &score_format)?;
        details.write_string(r, 8, if row.passed { "Passed" } else { "Failed" })?;
    }
    details.set_column_width(1, 28)?;
    details.set_column_width(2, 32)?;
    details.set_column_width(5, 20)?;

    let passed = rows.iter().filter(|row| row.passed).count();
    let summary = workbook.add_worksheet().set_name("Summary")?;
    summary.write_string_with_format(0, 0, format!("Phase {phase} report"), &title_format)?;
    summary.write_string_with_format(2, 0, "Pass threshold", &header_format)?;
    summary.write_number_with_format(2, 1, pass_threshold, &score_format)?;
    summary.write_string_with_format(3, 0, "Evaluated", &header_format)?;
    summary.write_number(3, 1, rows.len() as f64)?;
    summary.write_string_with_format(4, 0, "Passed", &header_format)?;
    summary.write_number(4, 1, passed as f64)?;
    summary.write_string_with_format(5, 0, "Failed", &header_format)?;
    summary.write_number(5, 1, (rows.len() - passed) as f64)?;
    summary.set_column_width(0, 20)?;

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64) -> StudentInfo {
        StudentInfo {
            id,
            user_id: id + 100,
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            email: format!("student{id}@example.com"),
            grade_level: 8,
            group_name: Some("B".into()),
            guardian_name: None,
            guardian_email: None,
        }
    }

    #[test]
    fn test_generate_xlsx_produces_zip_archive() {
        let rows = vec![ReportRow {
            student: student(1),
            subject: "Mathematics".into(),
            score: PhaseScore {
                score: 3.2,
                grade_count: 2,
                total_weight: 2.0,
            },
            passed: false,
        }];
        let bytes = generate_xlsx(1, 3.5, &rows).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
