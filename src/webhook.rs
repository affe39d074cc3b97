use crate::state::ServerState;
use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use roster_core::Player;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

/// Fields of the provider's inbound message callback that the bot reads.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "ProfileName")]
    pub profile_name: Option<String>,
}

#[async_trait]
impl<S> FromRequest<S> for WebhookPayload
where
    S: Send + Sync,
{
    type Rejection = WebhookError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let Json(payload) = Json::<WebhookPayload>::from_request(req, state)
                .await
                .map_err(|e| WebhookError::Payload(e.body_text()))?;
            Ok(payload)
        } else {
            let Form(payload) = Form::<WebhookPayload>::from_request(req, state)
                .await
                .map_err(|e| WebhookError::Payload(e.body_text()))?;
            Ok(payload)
        }
    }
}

/// A validated inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub from: String,
    pub display_name: Option<String>,
    pub text: String,
}

impl InboundMessage {
    /// Validates a payload, stripping `"{channel_prefix}:"` from the sender.
    pub fn from_payload(
        payload: WebhookPayload,
        channel_prefix: &str,
    ) -> Result<Self, WebhookError> {
        let from = payload
            .from
            .map(|from| {
                let from = from.trim();
                let prefix = format!("{channel_prefix}:");
                from.strip_prefix(prefix.as_str()).unwrap_or(from).to_string()
            })
            .filter(|from| !from.is_empty())
            .ok_or(WebhookError::MissingSender)?;

        let text = payload
            .body
            .filter(|body| !body.trim().is_empty())
            .ok_or(WebhookError::MissingBody)?;

        Ok(Self {
            from,
            display_name: payload.profile_name,
            text,
        })
    }

    pub fn into_player(self) -> Player {
        Player::new(self.from, self.display_name)
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("unreadable payload: {0}")]
    Payload(String),
    #[error("payload has no sender address")]
    MissingSender,
    #[error("payload has no message body")]
    MissingBody,
    #[error("roster state is unavailable")]
    StateUnavailable,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        error!("Error processing webhook: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Error processing webhook").into_response()
    }
}

/// Receives one inbound message, applies it and sends the replies before
/// acknowledging.
pub async fn webhook_handler(
    State(state): State<ServerState>,
    payload: WebhookPayload,
) -> Result<&'static str, WebhookError> {
    debug!(?payload, "Received webhook");
    let message = InboundMessage::from_payload(payload, state.channel_prefix())?;
    info!(
        from = %message.from,
        text = %message.text,
        name = message.display_name.as_deref().unwrap_or_default(),
        "Processing message"
    );

    let replies = state.handle(message)?;
    let total = replies.len();
    let delivered = state.dispatch(replies).await;
    debug!(total, delivered, "Dispatched replies");
    Ok("OK")
}
