pub mod args;
pub mod gateway;
pub mod state;
pub mod webhook;

use crate::{
    args::Args,
    gateway::{LogGateway, MessagingGateway, TwilioGateway},
    state::ServerState,
    webhook::webhook_handler,
};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use roster_core::Roster;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

pub fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_bot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_file(false)
                .with_target(false),
        )
        .init();
}

fn set_or_not(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "set"
    } else {
        "not set"
    }
}

/// Builds the shared state from configuration, picking the Twilio gateway
/// when credentials are present and logging replies otherwise.
pub fn build_state(args: &Args) -> anyhow::Result<ServerState> {
    info!(
        account_sid = set_or_not(&args.twilio_account_sid),
        auth_token = set_or_not(&args.twilio_auth_token),
        phone_number = set_or_not(&args.twilio_phone_number),
        max_players = args.max_players,
        "Configuration loaded"
    );

    let gateway: Arc<dyn MessagingGateway> = match args.twilio_credentials() {
        Some((sid, token, number)) if !args.dry_run => {
            let client = reqwest::Client::builder()
                .timeout(args.send_timeout())
                .build()?;
            Arc::new(TwilioGateway::new(
                client,
                &args.twilio_api_base,
                sid,
                token,
                number,
                &args.channel_prefix,
            ))
        }
        Some(_) => Arc::new(LogGateway),
        None => {
            if !args.dry_run {
                warn!("Twilio credentials are incomplete, replies will only be logged");
            }
            Arc::new(LogGateway)
        }
    };

    let roster = Roster::new(args.max_players)
        .with_game_day(&args.game_day)
        .with_numeric_shortcuts(!args.no_numeric_shortcuts);

    Ok(ServerState::new(roster, gateway)
        .with_numeric_shortcuts(!args.no_numeric_shortcuts)
        .with_channel_prefix(&args.channel_prefix)
        .with_send_timeout(args.send_timeout()))
}

pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: ServerState) -> anyhow::Result<()> {
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let state = build_state(&args)?;
    let listener = TcpListener::bind(args.addr()).await?;
    serve(listener, state).await
}

pub async fn health_handler() -> impl IntoResponse {
    StatusCode::OK
}
