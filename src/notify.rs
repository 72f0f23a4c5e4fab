//! Outbound member notifications (credential notices after bulk creation).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Body accepted by the `send-email` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, msg: &EmailMessage) -> Result<()>;
}

/// POSTs each message as JSON to a mail relay.
pub struct HttpNotifier {
    client: Client,
    endpoint: String,
}

impl HttpNotifier {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, msg: &EmailMessage) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .json(msg)
            .send()
            .await
            .with_context(|| format!("posting notice for {}", msg.to))?
            .error_for_status()
            .with_context(|| format!("mail relay rejected notice for {}", msg.to))?;
        Ok(())
    }
}

/// Notice telling a bulk-created member their login and default password.
pub fn credential_notice(email: &str, full_name: &str, password: &str, portal_url: &str) -> EmailMessage {
    let name = if full_name.trim().is_empty() {
        "Survivor"
    } else {
        full_name.trim()
    };

    let body = format!(
        "<p>Hi {name},</p>\
         <p>Your Alliance Portal account has been created successfully!</p>\
         <p><b>Login Email:</b> {email}<br/><b>Password:</b> {password}</p>\
         <p>Please log in and change your password immediately.</p>\
         <p>Portal Link: <a href=\"{portal_url}\">Alliance Portal</a></p>"
    );

    EmailMessage {
        to: email.to_owned(),
        subject: "Your Alliance Portal Login".into(),
        body,
    }
}
