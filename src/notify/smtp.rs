/// Direct SMTP submission over STARTTLS
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::DeliveryError;
use crate::notify::NotificationTransport;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
}

pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailTransport {
    pub fn new(config: SmtpConfig) -> Result<Self, DeliveryError> {
        let credentials = Credentials::new(config.username, config.password);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .credentials(credentials)
            .port(config.port)
            .build();
        Ok(Self {
            mailer,
            sender: config.sender,
        })
    }

    fn mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
        address.parse().map_err(|e| DeliveryError::Address {
            address: address.to_string(),
            reason: format!("{}", e),
        })
    }
}

#[async_trait]
impl NotificationTransport for SmtpMailTransport {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), DeliveryError> {
        let email = Message::builder()
            .from(Self::mailbox(&self.sender)?)
            .to(Self::mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_address_is_a_delivery_error() {
        let err = SmtpMailTransport::mailbox("not an address").unwrap_err();
        assert!(matches!(err, DeliveryError::Address { .. }));
    }
}
