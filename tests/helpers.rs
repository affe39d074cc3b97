#![allow(dead_code)]

use async_trait::async_trait;
use roster_bot::gateway::{GatewayError, MessagingGateway};
use roster_bot::state::ServerState;
use roster_core::Roster;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Records every message it is asked to send. Sends to addresses in
/// `failing` return an error, sends to addresses in `hanging` never finish.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    failing: HashSet<String>,
    hanging: HashSet<String>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn failing_for(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    pub fn hanging_for(mut self, address: &str) -> Self {
        self.hanging.insert(address.to_string());
        self
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, address: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(to, _)| to == address)
            .map(|(_, body)| body)
            .collect()
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        if self.hanging.contains(to) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(to) {
            return Err(GatewayError::Rejected {
                status: 400,
                body: "invalid To number".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

pub fn test_state(capacity: usize, gateway: &RecordingGateway) -> ServerState {
    ServerState::new(Roster::new(capacity), Arc::new(gateway.clone()))
        .with_send_timeout(Duration::from_millis(200))
}

pub async fn spawn_app(state: ServerState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        roster_bot::serve(listener, state).await.unwrap();
    });
    addr
}

pub async fn send_message(
    client: &reqwest::Client,
    addr: SocketAddr,
    from: &str,
    name: &str,
    body: &str,
) -> reqwest::Response {
    let from = format!("whatsapp:{from}");
    let params = [("From", from.as_str()), ("ProfileName", name), ("Body", body)];
    client
        .post(format!("http://{}/webhook", addr))
        .form(&params)
        .send()
        .await
        .unwrap()
}
