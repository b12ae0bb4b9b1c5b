use async_trait::async_trait;

use super::templates::MailLinks;
use crate::account::errors::MailError;
use crate::domain::account::models::MailTemplate;
use crate::domain::account::ports::MailDispatcher;

/// Local development dispatcher that logs the link instead of sending mail.
#[derive(Debug, Clone)]
pub struct LogMailDispatcher {
    links: MailLinks,
}

impl LogMailDispatcher {
    pub fn new(links: MailLinks) -> Self {
        Self { links }
    }
}

#[async_trait]
impl MailDispatcher for LogMailDispatcher {
    async fn send(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        template: MailTemplate,
        token: &str,
    ) -> Result<(), MailError> {
        tracing::info!(
            to_name = %to_name,
            to_email = %to_email,
            subject = %subject,
            template = template.as_str(),
            link = %self.links.link(template, token),
            "Mail dispatch stub"
        );
        Ok(())
    }
}
