use async_trait::async_trait;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{Mailer, OutgoingMail};
use crate::config::MailConfig;
use crate::errors::{Result, SEIOError};

/// SMTP 邮件后端（465 端口隐式 TLS，其他端口 STARTTLS）
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| SEIOError::mail(format!("发件人地址无效: {e}")))?;

        let builder = if config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| SEIOError::mail(format!("SMTP 配置无效: {e}")))?
        .port(config.smtp_port);

        let builder = if config.smtp_username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        if mail.to.is_empty() {
            return Err(SEIOError::mail("邮件没有收件人"));
        }

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(mail.subject.clone());
        for address in &mail.to {
            builder = builder.to(parse_mailbox(address)?);
        }
        for address in &mail.cc {
            builder = builder.cc(parse_mailbox(address)?);
        }

        let mut body = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
        for attachment in &mail.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| SEIOError::mail(format!("附件类型无效: {e}")))?;
            body = body.singlepart(
                Attachment::new(attachment.file_name.clone())
                    .body(attachment.data.clone(), content_type),
            );
        }

        builder
            .multipart(body)
            .map_err(|e| SEIOError::mail(format!("构建邮件失败: {e}")))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| SEIOError::mail(format!("收件人地址无效 '{address}': {e}")))
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = self.build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| SEIOError::mail(format!("SMTP 发送失败: {e}")))?;
        debug!("Mail sent to {:?}: {}", mail.recipients(), mail.subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailConfig {
        MailConfig {
            enabled: true,
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            smtp_username: "seio".into(),
            smtp_password: "secret".into(),
            from_address: "no-reply@example.com".into(),
            from_name: "SEIO".into(),
        }
    }

    #[tokio::test]
    async fn test_build_message_rejects_empty_recipients() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let err = mailer
            .build_message(&OutgoingMail::new("subject", "body"))
            .unwrap_err();
        assert_eq!(err.code(), "E014");
    }

    #[tokio::test]
    async fn test_build_message_with_attachment() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let mail = OutgoingMail::new("Plan", "See attachment")
            .to("student@example.com")
            .attach(super::super::MailAttachment {
                file_name: "plan.pdf".into(),
                content_type: "application/pdf".into(),
                data: b"%PDF-1.3".to_vec(),
            });
        let message = mailer.build_message(&mail).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("plan.pdf"));
    }
}
