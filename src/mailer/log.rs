use async_trait::async_trait;
use tracing::info;

use super::{Mailer, OutgoingMail};
use crate::errors::Result;

/// 只记录日志、不真正发送的邮件后端
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        info!(
            to = ?mail.to,
            cc = ?mail.cc,
            attachments = mail.attachments.len(),
            "Mail delivery disabled, would send: {}",
            mail.subject
        );
        Ok(())
    }
}
