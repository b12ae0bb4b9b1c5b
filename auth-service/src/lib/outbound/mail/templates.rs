use crate::domain::account::models::MailTemplate;

/// Link bases that mailed tokens are appended to.
#[derive(Debug, Clone)]
pub struct MailLinks {
    pub activation_url: String,
    pub reset_url: String,
}

impl MailLinks {
    pub fn new(activation_url: impl Into<String>, reset_url: impl Into<String>) -> Self {
        Self {
            activation_url: activation_url.into(),
            reset_url: reset_url.into(),
        }
    }

    /// Link the recipient follows to spend `token`.
    pub fn link(&self, template: MailTemplate, token: &str) -> String {
        let base = match template {
            MailTemplate::Register => &self.activation_url,
            MailTemplate::Forgot => &self.reset_url,
        };
        let separator = if base.contains('?') { '&' } else { '?' };

        format!("{}{}token={}", base, separator, token)
    }

    /// HTML body for `template`.
    pub fn render(&self, template: MailTemplate, to_name: &str, token: &str) -> String {
        let to_name = escape_html(to_name);
        let link = escape_html(&self.link(template, token));

        match template {
            MailTemplate::Register => format!(
                "<p>Hi {},</p>\
                 <p>Thanks for signing up. Confirm your account by following the link below.</p>\
                 <p><a href=\"{}\">Activate account</a></p>",
                to_name, link
            ),
            MailTemplate::Forgot => format!(
                "<p>Hi {},</p>\
                 <p>We received a request to reset your password. Follow the link below to choose a new one.</p>\
                 <p><a href=\"{}\">Reset password</a></p>\
                 <p>If you did not ask for this, ignore this email.</p>",
                to_name, link
            ),
        }
    }
}

/// Escape text for use in HTML element content or a quoted attribute.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> MailLinks {
        MailLinks::new("https://app.test/activate", "https://app.test/reset?lang=en")
    }

    #[test]
    fn test_link_appends_token() {
        assert_eq!(
            links().link(MailTemplate::Register, "abc"),
            "https://app.test/activate?token=abc"
        );
        assert_eq!(
            links().link(MailTemplate::Forgot, "abc"),
            "https://app.test/reset?lang=en&token=abc"
        );
    }

    #[test]
    fn test_render_embeds_link_and_name() {
        let body = links().render(MailTemplate::Register, "Ada", "abc");
        assert!(body.contains("Hi Ada"));
        assert!(body.contains("https://app.test/activate?token=abc"));

        let body = links().render(MailTemplate::Forgot, "Ada", "xyz");
        assert!(body.contains("reset?lang=en&amp;token=xyz"));
    }

    #[test]
    fn test_render_escapes_recipient_name() {
        let body = links().render(
            MailTemplate::Register,
            "<a href=\"https://evil.test\">Click</a>",
            "abc",
        );

        assert!(!body.contains("<a href=\"https://evil.test\">"));
        assert!(body.contains("Hi &lt;a href=&quot;https://evil.test&quot;&gt;Click&lt;/a&gt;,"));
        assert_eq!(body.matches("<a ").count(), 1);
    }
}
