/**
 * Chat API Client
 *
 * HTTP client for the remote chat service. The synchronization core talks to
 * the service only through the `ChatTransport` trait, so tests and alternative
 * backends can stand in for `ChatApi`.
 */

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::config::Config;
use crate::shared::error::TransportError;
use crate::shared::messaging::{Message, Participant, SessionInfo};

/// Result type for transport calls
pub type Result<T> = std::result::Result<T, TransportError>;

/// Operations the synchronization core needs from the remote chat service.
///
/// Every call fails with a [`TransportError`] on network failure or a
/// non-success status. Timeout policy belongs to the implementation.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Current session marker and API version
    async fn get_session_info(&self) -> Result<SessionInfo>;

    /// Most recent page of messages
    async fn get_latest_messages(&self) -> Result<Vec<Message>>;

    /// Every message the server holds
    async fn get_all_messages(&self) -> Result<Vec<Message>>;

    /// Page of messages sent before the message `anchor_id`
    async fn get_older_messages(&self, anchor_id: &str) -> Result<Vec<Message>>;

    /// Messages created or modified after `since` (ms since epoch)
    async fn get_message_updates_since(&self, since: i64) -> Result<Vec<Message>>;

    /// Post a new message; returns the server-confirmed record
    async fn send_message(&self, text: &str) -> Result<Message>;

    /// Every participant the server holds
    async fn get_all_participants(&self) -> Result<Vec<Participant>>;

    /// Participants created or modified after `since` (ms since epoch)
    async fn get_participant_updates_since(&self, since: i64) -> Result<Vec<Participant>>;
}

#[derive(Serialize)]
struct NewMessage<'a> {
    text: &'a str,
}

/// `ChatTransport` over HTTP/JSON
#[derive(Debug, Clone)]
pub struct ChatApi {
    config: Config,
    client: Client,
}

impl ChatApi {
    /// Create a client for the server named in `config`
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TransportError::network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Base URL requests are issued against
    pub fn server_url(&self) -> &str {
        self.config.server_url()
    }

    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.api_url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("API error for {}: {}", path, e);
            TransportError::network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("API error for {}: HTTP {}", path, status);
            return Err(TransportError::status(status.as_u16(), path));
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!("API error for {}: {}", path, e);
            TransportError::network(e.to_string())
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!("API error for {}: malformed body: {}", path, e);
            TransportError::decode(path, e.to_string())
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }
}

#[async_trait]
impl ChatTransport for ChatApi {
    async fn get_session_info(&self) -> Result<SessionInfo> {
        self.get("/info").await
    }

    async fn get_latest_messages(&self) -> Result<Vec<Message>> {
        self.get("/messages/latest").await
    }

    async fn get_all_messages(&self) -> Result<Vec<Message>> {
        self.get("/messages/all").await
    }

    async fn get_older_messages(&self, anchor_id: &str) -> Result<Vec<Message>> {
        self.get(&format!("/messages/older/{}", anchor_id)).await
    }

    async fn get_message_updates_since(&self, since: i64) -> Result<Vec<Message>> {
        self.get(&format!("/messages/updates/{}", since)).await
    }

    async fn send_message(&self, text: &str) -> Result<Message> {
        self.request(Method::POST, "/messages/new", Some(&NewMessage { text }))
            .await
    }

    async fn get_all_participants(&self) -> Result<Vec<Participant>> {
        self.get("/participants/all").await
    }

    async fn get_participant_updates_since(&self, since: i64) -> Result<Vec<Participant>> {
        self.get(&format!("/participants/updates/{}", since)).await
    }
}
