use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

/// Outbound mail collaborator for the contact form. Delivery problems stay
/// on the contact path; no other endpoint ever waits on this.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_contact(&self, name: &str, reply_to: &str, message: &str) -> anyhow::Result<()>;
}

/// Delivers contact messages through the SendGrid v3 API.
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    recipient: String,
    sender: String,
}

impl SendGridMailer {
    pub fn new(api_key: &str, recipient: &str, sender: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            recipient: recipient.to_string(),
            sender: sender.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_contact(&self, name: &str, reply_to: &str, message: &str) -> anyhow::Result<()> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": self.recipient }] }],
            "from": { "email": self.sender },
            "reply_to": { "email": reply_to },
            "subject": format!("Portfolio Contact from {name}"),
            "content": [{
                "type": "text/plain",
                "value": format!("From: {name} ({reply_to})\n\nMessage: {message}"),
            }],
        });

        let response = self
            .client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("sendgrid request")?;

        if !response.status().is_success() {
            anyhow::bail!("sendgrid responded with {}", response.status());
        }
        Ok(())
    }
}

/// Used when no SendGrid key is configured: logs the would-be email and
/// reports success, mirroring a development setup.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_contact(&self, name: &str, reply_to: &str, message: &str) -> anyhow::Result<()> {
        info!(%name, %reply_to, %message, "contact email (no mail provider configured)");
        Ok(())
    }
}
