//! 改进计划 PDF 文档
//!
//! 使用内置 Helvetica 字体按行排版，超出页面时自动换页。

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::errors::SEIOError;
use crate::models::activities::entities::RecoveryActivity;
use crate::models::improvement_plans::entities::ImprovementPlan;
use crate::models::students::entities::StudentInfo;
use crate::models::teachers::entities::TeacherInfo;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const WRAP_CHARS: usize = 90;

/// 生成文档所需的全部数据
pub struct PlanDocument<'a> {
    pub system_name: &'a str,
    pub plan: &'a ImprovementPlan,
    pub student: &'a StudentInfo,
    pub teacher: &'a TeacherInfo,
    pub activities: &'a [RecoveryActivity],
    pub pass_threshold: f64,
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, SEIOError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| SEIOError::document(format!("加载字体失败: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| SEIOError::document(format!("加载字体失败: {e}")))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN,
        })
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor = PAGE_HEIGHT - MARGIN;
        }
    }

    fn heading(&mut self, text: &str, size: f32) {
        let height = size * 0.5;
        self.ensure_space(height);
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.cursor), &self.bold);
        self.cursor -= height + 2.0;
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap_text(text, WRAP_CHARS) {
            self.ensure_space(6.0);
            self.layer
                .use_text(line, 10.0, Mm(MARGIN), Mm(self.cursor), &self.regular);
            self.cursor -= 5.5;
        }
    }

    fn field(&mut self, label: &str, value: &str) {
        self.paragraph(&format!("{label}: {value}"));
    }

    fn gap(&mut self) {
        self.cursor -= 4.0;
    }

    fn finish(self) -> Result<Vec<u8>, SEIOError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| SEIOError::document(format!("生成 PDF 失败: {e}")))
    }
}

/// 按单词换行
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn format_date(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// 渲染改进计划文档
pub fn render_plan_pdf(input: &PlanDocument<'_>) -> Result<Vec<u8>, SEIOError> {
    let plan = input.plan;
    let mut writer = PageWriter::new(&plan.title)?;

    writer.heading(input.system_name, 12.0);
    writer.heading("Academic Improvement Plan", 18.0);
    writer.gap();

    writer.field("Student", &input.student.full_name());
    writer.field("Grade level", &input.student.grade_level.to_string());
    if let Some(group) = &input.student.group_name {
        writer.field("Group", group);
    }
    writer.field("Teacher", &input.teacher.full_name());
    writer.field("Subject", &plan.subject);
    writer.field("Phase", &plan.phase.to_string());
    if let Some(score) = plan.phase_score {
        writer.field(
            "Phase score",
            &format!("{score:.2} (pass threshold {:.2})", input.pass_threshold),
        );
    }
    writer.field("Status", plan.status.as_str());
    writer.field("Created", &format_date(Some(plan.created_at)));
    writer.field("Deadline", &format_date(plan.deadline));
    writer.gap();

    writer.heading(&plan.title, 13.0);
    if let Some(description) = &plan.description {
        writer.paragraph(description);
    }
    writer.gap();

    writer.heading("Indicators not achieved", 13.0);
    if plan.failed_indicators.is_empty() {
        writer.paragraph("No specific indicators were recorded for this phase.");
    } else {
        for (index, indicator) in plan.failed_indicators.iter().enumerate() {
            writer.paragraph(&format!("{}. {}", index + 1, indicator.description));
        }
    }
    writer.gap();

    writer.heading("Recovery activities", 13.0);
    if input.activities.is_empty() {
        writer.paragraph("Activities will be assigned by the teacher.");
    }
    for (index, activity) in input.activities.iter().enumerate() {
        writer.paragraph(&format!(
            "{}. {} (due {})",
            index + 1,
            activity.title,
            format_date(activity.due_date)
        ));
        if let Some(description) = &activity.description {
            writer.paragraph(&format!("   {description}"));
        }
    }

    if let Some(notes) = &plan.teacher_notes {
        writer.gap();
        writer.heading("Teacher notes", 13.0);
        writer.paragraph(notes);
    }

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::improvement_plans::entities::{FailedIndicator, PlanStatus};
    use chrono::Utc;

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_render_plan_pdf() {
        let plan = ImprovementPlan {
            id: 1,
            student_id: 2,
            teacher_id: 3,
            subject: "Mathematics".into(),
            phase: 2,
            title: "Improvement plan - Mathematics - phase 2".into(),
            description: Some("Reinforce fractions and proportions. ".repeat(20)),
            failed_indicators: vec![FailedIndicator {
                indicator_id: 7,
                description: "Solves problems with fractions".into(),
            }],
            phase_score: Some(2.8),
            status: PlanStatus::Pending,
            deadline: Some(Utc::now()),
            teacher_notes: None,
            document_token: None,
            email_sent_at: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let student = StudentInfo {
            id: 2,
            user_id: 20,
            first_name: "Laura".into(),
            last_name: "Gomez".into(),
            email: "laura@example.com".into(),
            grade_level: 7,
            group_name: Some("7B".into()),
            guardian_name: None,
            guardian_email: None,
        };
        let teacher = TeacherInfo {
            id: 3,
            user_id: 30,
            first_name: "Carlos".into(),
            last_name: "Ruiz".into(),
            email: "carlos@example.com".into(),
            subject: "Mathematics".into(),
            institution: None,
        };
        let bytes = render_plan_pdf(&PlanDocument {
            system_name: "SEIO",
            plan: &plan,
            student: &student,
            teacher: &teacher,
            activities: &[],
            pass_threshold: 3.5,
        })
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
