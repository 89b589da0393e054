/// Transactional-email delivery via the MailerSend HTTP API
use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::notify::NotificationTransport;

const MAILERSEND_URL: &str = "https://api.mailersend.com/v1/email";
const SENDER_NAME: &str = "Alert System";

pub struct MailerSendTransport {
    client: reqwest::Client,
    api_token: String,
    sender: String,
}

impl MailerSendTransport {
    pub fn new(api_token: String, sender: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token,
            sender,
        }
    }

    fn build_payload(&self, to: &str, subject: &str, html_body: &str) -> serde_json::Value {
        serde_json::json!({
            "from": {
                "email": self.sender,
                "name": SENDER_NAME,
            },
            "to": [
                { "email": to }
            ],
            "subject": subject,
            "text": "A sensor reported readings outside the ideal range.",
            "html": html_body,
        })
    }
}

#[async_trait]
impl NotificationTransport for MailerSendTransport {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(MAILERSEND_URL)
            .bearer_auth(&self.api_token)
            .json(&self.build_payload(to, subject, html_body))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Rejected {
                transport: "mailersend",
                status: status.as_u16(),
            })
        }
    }

    fn name(&self) -> &str {
        "mailersend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let transport =
            MailerSendTransport::new("token".to_string(), "alerts@example.com".to_string());
        let payload = transport.build_payload("to@example.com", "Subject", "<p>body</p>");
        assert_eq!(payload["from"]["email"], "alerts@example.com");
        assert_eq!(payload["to"][0]["email"], "to@example.com");
        assert_eq!(payload["subject"], "Subject");
        assert_eq!(payload["html"], "<p>body</p>");
    }
}
