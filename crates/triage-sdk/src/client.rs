//! HTTP client for the ticket triage backend.
//!
//! [`TriageClient`] issues one request per operation with no retry. Any
//! non-2xx response becomes [`SdkError::Status`]; callers decide whether to
//! log, surface or ignore it.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use triage_models::TicketId;
//! use triage_sdk::TriageClient;
//!
//! # async fn run() -> Result<(), triage_sdk::SdkError> {
//! let client = TriageClient::new("http://127.0.0.1:5001")?;
//! client.resolve_ticket_by_id(&TicketId::new("42")).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Method, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use triage_models::{Message, MessageId, Ticket, TicketCounts, TicketId, TicketPage, TicketStatus};

use crate::endpoints::Endpoints;
use crate::error::SdkError;

/// Client for the triage backend REST API.
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection
/// pool between clones.
#[derive(Clone, Debug)]
pub struct TriageClient {
    http: reqwest::Client,
    base_url: String,
}

impl TriageClient {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_http_client(base_url, http)
    }

    /// Create a client on top of a preconfigured `reqwest::Client`.
    ///
    /// `base_url` must be an absolute `http` or `https` URL; a trailing `/`
    /// is ignored.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self, SdkError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| SdkError::Config(format!("invalid backend URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SdkError::Config(format!(
                "backend URL {base_url:?} must use http or https"
            )));
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL every route is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response, SdkError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, ?query, "backend request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let res = request.send().await.inspect_err(|e| {
            warn!(%method, %url, error = %e, "backend unreachable");
        })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_else(|e| {
                warn!(%method, %url, error = %e, "could not read error body");
                String::new()
            });
            warn!(%method, %url, status = status.as_u16(), %body, "backend rejected request");
            return Err(SdkError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SdkError> {
        let res = self.send(Method::GET, path, query).await?;
        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(%path, error = %e, "malformed backend response");
            SdkError::Serialization(e)
        })
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// `GET /healthz`.
    pub async fn health(&self) -> Result<(), SdkError> {
        self.send(Method::GET, Endpoints::health(), &[]).await?;
        Ok(())
    }

    /// Number of tickets in each status.
    pub async fn get_statistics(&self) -> Result<TicketCounts, SdkError> {
        self.get_json(Endpoints::stats(), &[]).await
    }

    /// At most `limit` tickets in `status`, after skipping `skip`, along with
    /// the totals for every status.
    pub async fn get_tickets(
        &self,
        skip: usize,
        limit: usize,
        status: TicketStatus,
    ) -> Result<TicketPage, SdkError> {
        let query = [
            ("skip", skip.to_string()),
            ("limit", limit.to_string()),
            ("status", status.to_string()),
        ];
        self.get_json(Endpoints::tickets(), &query).await
    }

    /// A single ticket.
    pub async fn get_ticket(&self, id: &TicketId) -> Result<Ticket, SdkError> {
        self.get_json(&Endpoints::ticket(id), &[]).await
    }

    /// The message that raised a ticket.
    pub async fn get_ticket_message(&self, id: &TicketId) -> Result<Message, SdkError> {
        self.get_json(&Endpoints::ticket_message(id), &[]).await
    }

    /// Every context message of a ticket.
    pub async fn get_ticket_context_messages_by_id(
        &self,
        id: &TicketId,
    ) -> Result<Vec<Message>, SdkError> {
        self.get_json(&Endpoints::ticket_context_messages(id), &[])
            .await
    }

    /// A single message.
    pub async fn get_message(&self, id: &MessageId) -> Result<Message, SdkError> {
        self.get_json(&Endpoints::message(id), &[]).await
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Mark a ticket resolved (`PUT /ticket/{id}`).
    pub async fn resolve_ticket_by_id(&self, id: &TicketId) -> Result<(), SdkError> {
        self.send(Method::PUT, &Endpoints::ticket(id), &[]).await?;
        info!(ticket = %id, "ticket resolved");
        Ok(())
    }

    /// Soft-delete a ticket (`DELETE /ticket/{id}`).
    pub async fn delete_ticket_by_id(&self, id: &TicketId) -> Result<(), SdkError> {
        self.send(Method::DELETE, &Endpoints::ticket(id), &[]).await?;
        info!(ticket = %id, "ticket deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, RawQuery, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;

    type RequestLog = Arc<Mutex<Vec<String>>>;

    fn message_json(id: &str) -> Value {
        json!({
            "id": id,
            "channel_id": "c-1",
            "timestamp": "2023-05-04T10:00:00",
            "has_attachment": false,
            "timestamp_insert": "2023-05-04T10:00:01",
            "discussion_id": null,
            "author_id": "a-1",
            "content": format!("content of {id}"),
            "msg_url": format!("https://chat.example.com/{id}"),
            "author": {"nickname": "Alice", "is_bot": false}
        })
    }

    fn ticket_json(id: &str, status: &str) -> Value {
        json!({
            "id": id,
            "msg_id": format!("m-{id}"),
            "status": status,
            "ts_last_status_change": null,
            "timestamp": "2023-05-04T10:00:00",
            "context_messages": ["c-1", "c-2"],
            "message": message_json(&format!("m-{id}")),
        })
    }

    fn not_found(id: &str) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": format!("No such ticket with id: {id}")})),
        )
            .into_response()
    }

    async fn tickets(State(log): State<RequestLog>, RawQuery(query): RawQuery) -> Json<Value> {
        log.lock()
            .unwrap()
            .push(format!("GET /tickets?{}", query.unwrap_or_default()));
        Json(json!({
            "tickets": [ticket_json("t-1", "open"), ticket_json("t-2", "open")],
            "totalTickets": {"open": 2, "resolved": 5, "deleted": 1},
        }))
    }

    async fn mutate(
        State(log): State<RequestLog>,
        method: axum::http::Method,
        Path(id): Path<String>,
    ) -> Response {
        if id == "missing" {
            return not_found(&id);
        }
        log.lock().unwrap().push(format!("{method} /ticket/{id}"));
        let status = if method == axum::http::Method::PUT {
            "resolved"
        } else {
            "deleted"
        };
        Json(ticket_json(&id, status)).into_response()
    }

    async fn spawn_backend() -> (String, RequestLog) {
        let log = RequestLog::default();
        let app = Router::new()
            .route("/healthz", get(|| async { "OK" }))
            .route(
                "/stats",
                get(|| async { Json(json!({"open": 3, "resolved": 2, "deleted": 1})) }),
            )
            .route("/tickets", get(tickets))
            .route(
                "/ticket/{id}",
                get(|Path(id): Path<String>| async move {
                    if id == "missing" {
                        not_found(&id)
                    } else {
                        Json(ticket_json(&id, "open")).into_response()
                    }
                })
                .put(mutate)
                .delete(mutate),
            )
            .route(
                "/ticket/{id}/message",
                get(|Path(id): Path<String>| async move { Json(message_json(&format!("m-{id}"))) }),
            )
            .route(
                "/ticket/{id}/context-messages",
                get(|| async { Json(json!([message_json("c-1"), message_json("c-2")])) }),
            )
            .route(
                "/message/{id}",
                get(|Path(id): Path<String>| async move {
                    if id == "garbled" {
                        "this is not json".into_response()
                    } else {
                        Json(message_json(&id)).into_response()
                    }
                }),
            )
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), log)
    }

    #[tokio::test]
    async fn health_and_statistics() {
        let (base, _) = spawn_backend().await;
        let client = TriageClient::new(&base).unwrap();
        client.health().await.unwrap();
        let counts = client.get_statistics().await.unwrap();
        assert_eq!(counts, TicketCounts::new(3, 2, 1));
    }

    #[tokio::test]
    async fn get_tickets_sends_paging_query() {
        let (base, log) = spawn_backend().await;
        let client = TriageClient::new(&base).unwrap();

        let page = client
            .get_tickets(40, 20, TicketStatus::Resolved)
            .await
            .unwrap();
        assert_eq!(page.tickets.len(), 2);
        assert_eq!(page.total_tickets, TicketCounts::new(2, 5, 1));
        assert!(page.tickets[0].message.is_some());

        let log = log.lock().unwrap();
        assert_eq!(
            log.as_slice(),
            ["GET /tickets?skip=40&limit=20&status=resolved"]
        );
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_ignored() {
        let (base, _) = spawn_backend().await;
        let client = TriageClient::new(&format!("{base}/")).unwrap();
        assert_eq!(client.base_url(), base);
        assert!(client.get_statistics().await.is_ok());
    }

    #[tokio::test]
    async fn messages_for_ticket() {
        let (base, _) = spawn_backend().await;
        let client = TriageClient::new(&base).unwrap();
        let id = TicketId::new("t-1");

        let source = client.get_ticket_message(&id).await.unwrap();
        assert_eq!(source.id, MessageId::new("m-t-1"));

        let context = client.get_ticket_context_messages_by_id(&id).await.unwrap();
        let ids: Vec<_> = context.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["c-1", "c-2"]);

        let single = client.get_message(&MessageId::new("c-9")).await.unwrap();
        assert_eq!(single.content, "content of c-9");
    }

    #[tokio::test]
    async fn get_ticket_by_id() {
        let (base, _) = spawn_backend().await;
        let client = TriageClient::new(&base).unwrap();
        let ticket = client.get_ticket(&TicketId::new("t-7")).await.unwrap();
        assert_eq!(ticket.id, TicketId::new("t-7"));

        let err = client
            .get_ticket(&TicketId::new("missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn resolve_and_delete_use_put_and_delete() {
        let (base, log) = spawn_backend().await;
        let client = TriageClient::new(&base).unwrap();

        client
            .resolve_ticket_by_id(&TicketId::new("t-1"))
            .await
            .unwrap();
        client
            .delete_ticket_by_id(&TicketId::new("t-2"))
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.as_slice(), ["PUT /ticket/t-1", "DELETE /ticket/t-2"]);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base, _) = spawn_backend().await;
        let client = TriageClient::new(&base).unwrap();

        let err = client
            .resolve_ticket_by_id(&TicketId::new("missing"))
            .await
            .unwrap_err();
        match err {
            SdkError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("No such ticket"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn truncated_error_body_keeps_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 64\r\n\r\npartial")
                .await;
        });

        let client = TriageClient::new(&format!("http://{addr}")).unwrap();
        let err = client.get_statistics().await.unwrap_err();
        match err {
            SdkError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_serialization_error() {
        let (base, _) = spawn_backend().await;
        let client = TriageClient::new(&base).unwrap();
        let err = client
            .get_message(&MessageId::new("garbled"))
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Serialization(_)));
    }

    #[test]
    fn rejects_invalid_base_urls() {
        assert!(matches!(
            TriageClient::new("not a url"),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(
            TriageClient::new("ftp://127.0.0.1:5001"),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn timeout_client_builds() {
        let client =
            TriageClient::with_timeout("https://triage.example.com", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "https://triage.example.com");
    }
}
