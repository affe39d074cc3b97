use crate::gateway::{GatewayError, MessagingGateway};
use crate::webhook::{InboundMessage, WebhookError};
use roster_core::{Command, Reply, Roster};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error};

pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// State shared by every request handler.
///
/// All commands, reads included, go through the one roster lock. The lock is
/// released before any reply is sent.
#[derive(Clone)]
pub struct ServerState {
    roster: Arc<Mutex<Roster>>,
    gateway: Arc<dyn MessagingGateway>,
    numeric_shortcuts: bool,
    channel_prefix: String,
    send_timeout: Duration,
}

impl ServerState {
    pub fn new(roster: Roster, gateway: Arc<dyn MessagingGateway>) -> Self {
        Self {
            roster: Arc::new(Mutex::new(roster)),
            gateway,
            numeric_shortcuts: true,
            channel_prefix: "whatsapp".to_string(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_numeric_shortcuts(mut self, enabled: bool) -> Self {
        self.numeric_shortcuts = enabled;
        self
    }

    pub fn with_channel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.channel_prefix = prefix.into();
        self
    }

    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    pub fn channel_prefix(&self) -> &str {
        &self.channel_prefix
    }

    /// Parses the message and applies it to the roster.
    pub fn handle(&self, message: InboundMessage) -> Result<Vec<Reply>, WebhookError> {
        let command = Command::parse(&message.text, self.numeric_shortcuts);
        let player = message.into_player();
        let mut roster = self
            .roster
            .lock()
            .map_err(|_| WebhookError::StateUnavailable)?;
        let replies = roster.apply(command, player);
        debug!(
            ?command,
            mutating = command.is_mutating(),
            roster = roster.players().len(),
            waitlist = roster.waitlist().len(),
            replies = replies.len(),
            "Applied command"
        );
        Ok(replies)
    }

    /// Runs `f` against the current roster.
    pub fn with_roster<R>(&self, f: impl FnOnce(&Roster) -> R) -> Result<R, WebhookError> {
        let roster = self
            .roster
            .lock()
            .map_err(|_| WebhookError::StateUnavailable)?;
        Ok(f(&roster))
    }

    /// Sends replies one after another and returns how many were delivered.
    ///
    /// Each send is bounded by the send timeout. A failed send is logged and
    /// does not stop the ones after it.
    pub async fn dispatch(&self, replies: Vec<Reply>) -> usize {
        let mut delivered = 0;
        for reply in replies {
            let result = timeout(self.send_timeout, self.gateway.send(&reply.to, &reply.body))
                .await
                .unwrap_or(Err(GatewayError::Timeout));
            match result {
                Ok(()) => delivered += 1,
                Err(e) => error!(to = %reply.to, "Error sending message: {e}"),
            }
        }
        delivered
    }
}
