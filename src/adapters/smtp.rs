use crate::config::DEFAULT_RELAY_TIMEOUT;
use crate::domain::model::{Credentials, RenderedReport};
use crate::domain::ports::{MailRelay, RelaySession};
use crate::utils::error::{DeliveryStage, NotifyError, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

/// STARTTLS submission relay backed by lettre's blocking transport.
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    timeout: Duration,
}

impl SmtpRelay {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SmtpRelay {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_TIMEOUT)
    }
}

pub struct SmtpSession {
    transport: SmtpTransport,
    sender: Mailbox,
}

impl MailRelay for SmtpRelay {
    type Session = SmtpSession;

    fn open(&self, credentials: &Credentials) -> Result<SmtpSession> {
        let sender: Mailbox = credentials
            .sender_address
            .parse()
            .map_err(|e| NotifyError::delivery(DeliveryStage::Connect, e))?;

        let transport = SmtpTransport::starttls_relay(&credentials.relay_host)
            .map_err(|e| NotifyError::delivery(DeliveryStage::Connect, e))?
            .port(credentials.relay_port)
            .credentials(SmtpCredentials::new(
                credentials.sender_address.clone(),
                credentials.sender_secret.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        // Connects, upgrades and authenticates; the pooled connection is reused by send().
        let connected = transport
            .test_connection()
            .map_err(|e| NotifyError::delivery(DeliveryStage::Connect, e))?;
        if !connected {
            return Err(NotifyError::delivery(
                DeliveryStage::Connect,
                format!(
                    "relay {}:{} did not accept the connection",
                    credentials.relay_host, credentials.relay_port
                ),
            ));
        }

        tracing::debug!(
            "Connected to relay {}:{}",
            credentials.relay_host,
            credentials.relay_port
        );

        Ok(SmtpSession { transport, sender })
    }
}

impl RelaySession for SmtpSession {
    fn send(&mut self, recipient: &str, report: &RenderedReport) -> Result<()> {
        let to: Mailbox = recipient
            .trim()
            .parse()
            .map_err(|e| NotifyError::delivery(DeliveryStage::Send, e))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(report.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(report.body.clone())
            .map_err(|e| NotifyError::delivery(DeliveryStage::Send, e))?;

        self.transport
            .send(&message)
            .map_err(|e| NotifyError::delivery(DeliveryStage::Send, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(sender: &str) -> Credentials {
        Credentials {
            sender_address: sender.to_string(),
            sender_secret: "secret".to_string(),
            relay_host: "127.0.0.1".to_string(),
            relay_port: 1,
        }
    }

    #[test]
    fn test_invalid_sender_fails_at_connect() {
        let relay = SmtpRelay::default();
        match relay.open(&credentials("not an address")) {
            Err(NotifyError::DeliveryError { stage, .. }) => {
                assert_eq!(stage, DeliveryStage::Connect)
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("expected a delivery error"),
        }
    }

    #[test]
    fn test_unreachable_relay_fails_at_connect() {
        let relay = SmtpRelay::new(Duration::from_secs(2));
        match relay.open(&credentials("me@example.com")) {
            Err(NotifyError::DeliveryError { stage, .. }) => {
                assert_eq!(stage, DeliveryStage::Connect)
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("expected a delivery error"),
        }
    }
}
