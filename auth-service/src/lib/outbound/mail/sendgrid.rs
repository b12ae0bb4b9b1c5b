use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::templates::MailLinks;
use crate::account::errors::MailError;
use crate::domain::account::models::MailTemplate;
use crate::domain::account::ports::MailDispatcher;

const USER_AGENT: &str = concat!("auth-service/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct Mailbox<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Mailbox<'a>>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: String,
}

/// Body of a SendGrid v3 `mail/send` request.
#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Mailbox<'a>,
    subject: &'a str,
    content: Vec<Content>,
}

/// Delivers mail through the SendGrid HTTP API.
pub struct SendGridMailDispatcher {
    client: Client,
    endpoint: String,
    api_key: String,
    from_email: String,
    from_name: String,
    links: MailLinks,
}

impl SendGridMailDispatcher {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
        links: MailLinks,
    ) -> Result<Self, MailError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from_email: from_email.into(),
            from_name: from_name.into(),
            links,
        })
    }

    fn request<'a>(
        &'a self,
        to_name: &'a str,
        to_email: &'a str,
        subject: &'a str,
        template: MailTemplate,
        token: &str,
    ) -> SendMailRequest<'a> {
        SendMailRequest {
            personalizations: vec![Personalization {
                to: vec![Mailbox {
                    email: to_email,
                    name: to_name,
                }],
            }],
            from: Mailbox {
                email: &self.from_email,
                name: &self.from_name,
            },
            subject,
            content: vec![Content {
                content_type: "text/html",
                value: self.links.render(template, to_name, token),
            }],
        }
    }
}

#[async_trait]
impl MailDispatcher for SendGridMailDispatcher {
    async fn send(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        template: MailTemplate,
        token: &str,
    ) -> Result<(), MailError> {
        let body = self.request(to_name, to_email, subject, template, token);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                template = template.as_str(),
                "Mail provider rejected message"
            );
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            to_email = %to_email,
            template = template.as_str(),
            "Mail accepted by provider"
        );

        Ok(())
    }
}
