//! Outbound delivery of reply messages.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("send timed out")]
    Timeout,
}

/// Something that can deliver a text message to a channel address.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), GatewayError>;
}

/// Sends messages through the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioGateway {
    client: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from: String,
    channel_prefix: String,
}

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
}

impl TwilioGateway {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from: impl Into<String>,
        channel_prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from: from.into(),
            channel_prefix: channel_prefix.into(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }

    fn channel_address(&self, address: &str) -> String {
        if self.channel_prefix.is_empty() {
            address.to_string()
        } else {
            format!("{}:{}", self.channel_prefix, address)
        }
    }
}

#[async_trait]
impl MessagingGateway for TwilioGateway {
    async fn send(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        let from = self.channel_address(&self.from);
        let to = self.channel_address(to);
        let params = [("From", from.as_str()), ("To", to.as_str()), ("Body", body)];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        match response.json::<MessageResource>().await {
            Ok(message) => info!(to = %to, sid = %message.sid, "Message sent"),
            Err(e) => warn!(to = %to, "Message accepted but response was unreadable: {e}"),
        }
        Ok(())
    }
}

/// Logs outbound messages instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogGateway;

#[async_trait]
impl MessagingGateway for LogGateway {
    async fn send(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        info!(to = %to, body = %body, "Dry run, not sending message");
        Ok(())
    }
}
