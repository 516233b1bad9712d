//! 改进计划文档与通知
//!
//! 渲染 PDF、保存为文件记录、写回计划的 document_token，
//! 然后给学生（以及监护人）发送带附件的邮件并记录 email_sent_at。

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EvaluationConfig;
use crate::errors::{Result, SEIOError};
use crate::mailer::{MailAttachment, Mailer, OutgoingMail};
use crate::models::{
    activities::entities::RecoveryActivity,
    files::entities::{File, NewFile},
    improvement_plans::{
        entities::ImprovementPlan, requests::ImprovementPlanPatch, responses::PlanNotifyResponse,
    },
    students::entities::StudentInfo,
    teachers::entities::TeacherInfo,
};
use crate::storage::Storage;
use crate::utils::pdf::{PlanDocument, render_plan_pdf};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// 渲染完成的计划文档
pub struct RenderedPlan {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub student: StudentInfo,
    pub teacher: TeacherInfo,
    pub activities: Vec<RecoveryActivity>,
}

#[derive(Clone)]
pub struct PlanNotifier {
    storage: Arc<dyn Storage>,
    mailer: Arc<dyn Mailer>,
    settings: EvaluationConfig,
    upload_dir: PathBuf,
    system_name: String,
}

impl PlanNotifier {
    pub fn new(
        storage: Arc<dyn Storage>,
        mailer: Arc<dyn Mailer>,
        settings: EvaluationConfig,
        upload_dir: impl Into<PathBuf>,
        system_name: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            mailer,
            settings,
            upload_dir: upload_dir.into(),
            system_name: system_name.into(),
        }
    }

    pub fn document_file_name(plan: &ImprovementPlan) -> String {
        format!("improvement_plan_{}_phase_{}.pdf", plan.id, plan.phase)
    }

    /// 加载学生、教师与活动并渲染 PDF
    pub async fn render(&self, plan: &ImprovementPlan) -> Result<RenderedPlan> {
        let student = self
            .storage
            .get_student_info(plan.student_id)
            .await?
            .ok_or_else(|| SEIOError::not_found(format!("student {}", plan.student_id)))?;
        let teacher = self
            .storage
            .get_teacher_info(plan.teacher_id)
            .await?
            .ok_or_else(|| SEIOError::not_found(format!("teacher {}", plan.teacher_id)))?;
        let activities = self.storage.list_plan_activities(plan.id).await?;

        let bytes = render_plan_pdf(&PlanDocument {
            system_name: &self.system_name,
            plan,
            student: &student,
            teacher: &teacher,
            activities: &activities,
            pass_threshold: self.settings.pass_threshold,
        })?;

        Ok(RenderedPlan {
            file_name: Self::document_file_name(plan),
            bytes,
            student,
            teacher,
            activities,
        })
    }

    /// 将文档写入上传目录并登记为教师上传的文件
    pub async fn store_document(&self, rendered: &RenderedPlan) -> Result<File> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let token = Uuid::new_v4().to_string();
        let stored_name = format!("{token}.pdf");
        tokio::fs::write(self.upload_dir.join(&stored_name), &rendered.bytes).await?;

        self.storage
            .create_file(NewFile {
                token,
                original_name: rendered.file_name.clone(),
                stored_name,
                file_size: rendered.bytes.len() as i64,
                file_type: PDF_CONTENT_TYPE.to_string(),
                user_id: rendered.teacher.user_id,
            })
            .await
    }

    /// 删除被新文档取代的旧文档（记录与磁盘文件），失败只记录日志
    async fn discard_document(&self, token: &str) {
        match self.storage.delete_file(token).await {
            Ok(Some(old)) => {
                let path = self.upload_dir.join(&old.stored_name);
                if let Err(e) = tokio::fs::remove_file(&path).await
                    && e.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to remove old plan document {}: {}", path.display(), e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to delete old plan document {}: {}", token, e),
        }
    }

    /// 组装通知邮件
    pub fn compose_mail(&self, plan: &ImprovementPlan, rendered: &RenderedPlan) -> OutgoingMail {
        let student = &rendered.student;
        let subject = format!(
            "{}: improvement plan for {} (phase {})",
            self.system_name, plan.subject, plan.phase
        );

        let mut body = format!(
            "Dear {},\n\n{} has prepared an academic improvement plan for {} in phase {}.\n",
            student.full_name(),
            rendered.teacher.full_name(),
            plan.subject,
            plan.phase
        );
        if let Some(score) = plan.phase_score {
            body.push_str(&format!(
                "Phase score: {score:.2} (pass threshold {:.2}).\n",
                self.settings.pass_threshold
            ));
        }
        if let Some(deadline) = plan.deadline {
            body.push_str(&format!("Deadline: {}.\n", deadline.format("%Y-%m-%d")));
        }
        if !plan.failed_indicators.is_empty() {
            body.push_str("\nIndicators to work on:\n");
            for indicator in &plan.failed_indicators {
                body.push_str(&format!("- {}\n", indicator.description));
            }
        }
        if !rendered.activities.is_empty() {
            body.push_str("\nRecovery activities:\n");
            for activity in &rendered.activities {
                body.push_str(&format!("- {}\n", activity.title));
            }
        }
        body.push_str("\nThe full plan is attached as a PDF document.\n");

        let mut mail = OutgoingMail::new(subject, body)
            .to(student.email.clone())
            .attach(MailAttachment {
                file_name: rendered.file_name.clone(),
                content_type: PDF_CONTENT_TYPE.to_string(),
                data: rendered.bytes.clone(),
            });

        if self.settings.notify_guardians
            && let Some(guardian) = student
                .guardian_email
                .as_deref()
                .map(str::trim)
                .filter(|email| !email.is_empty())
            && guardian != student.email
        {
            mail = mail.cc(guardian.to_string());
        }

        mail
    }

    /// 渲染、保存并发送计划文档
    ///
    /// 文档保存成功后即写回 document_token 并删除旧文档，邮件失败时返回错误但保留新文档。
    pub async fn notify(&self, plan: &ImprovementPlan) -> Result<PlanNotifyResponse> {
        let rendered = self.render(plan).await?;
        let file = self.store_document(&rendered).await?;

        self.storage
            .update_improvement_plan(
                plan.id,
                ImprovementPlanPatch {
                    document_token: Some(file.token.clone()),
                    ..Default::default()
                },
            )
            .await?;

        if let Some(previous) = plan
            .document_token
            .as_deref()
            .filter(|token| *token != file.token)
        {
            self.discard_document(previous).await;
        }

        let mail = self.compose_mail(plan, &rendered);
        let recipients = mail.recipients();
        if let Err(e) = self.mailer.send(&mail).await {
            warn!(
                "Failed to email improvement plan {} via {}: {}",
                plan.id,
                self.mailer.name(),
                e
            );
            return Err(e);
        }

        let sent_at = Utc::now();
        self.storage
            .update_improvement_plan(
                plan.id,
                ImprovementPlanPatch {
                    email_sent_at: Some(sent_at),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            "Improvement plan {} sent to {}",
            plan.id,
            recipients.join(", ")
        );

        Ok(PlanNotifyResponse {
            plan_id: plan.id,
            recipients,
            document_token: file.token,
            email_sent_at: sent_at,
        })
    }
}
