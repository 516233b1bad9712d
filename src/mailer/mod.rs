//! 邮件发送
//!
//! `Mailer` 是业务代码唯一依赖的发送接口。配置开启时使用 SMTP，
//! 否则使用只写日志的实现。

mod log;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::MailConfig;
use crate::errors::Result;

pub use log::LogMailer;
pub use smtp::SmtpMailer;

/// 邮件附件
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// 待发送邮件（纯文本正文）
#[derive(Debug, Clone, Default)]
pub struct OutgoingMail {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<MailAttachment>,
}

impl OutgoingMail {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    pub fn attach(mut self, attachment: MailAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// 全部收件人（收件 + 抄送）
    pub fn recipients(&self) -> Vec<String> {
        self.to.iter().chain(self.cc.iter()).cloned().collect()
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// 后端名称，用于日志
    fn name(&self) -> &'static str;

    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// 按配置创建邮件后端
pub fn create_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>> {
    if config.enabled {
        Ok(Arc::new(SmtpMailer::new(config)?))
    } else {
        Ok(Arc::new(LogMailer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_mail_builder() {
        let mail = OutgoingMail::new("Plan", "Body")
            .to("student@example.com")
            .cc("guardian@example.com")
            .attach(MailAttachment {
                file_name: "plan.pdf".into(),
                content_type: "application/pdf".into(),
                data: b"%PDF".to_vec(),
            });
        assert_eq!(
            mail.recipients(),
            vec!["student@example.com", "guardian@example.com"]
        );
        assert_eq!(mail.attachments.len(), 1);
    }

    #[test]
    fn test_disabled_config_uses_log_mailer() {
        let config = MailConfig {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "seio@example.com".into(),
            from_name: "SEIO".into(),
        };
        let mailer = create_mailer(&config).unwrap();
        assert_eq!(mailer.name(), "log");
    }
}
