//! Canonical backend route definitions.
//!
//! Every path the SDK requests is built through [`Endpoints`], so the client,
//! tests and tooling agree on one naming convention.
//!
//! # Route layout
//!
//! ```text
//! GET    /healthz                          ← liveness
//! GET    /stats                            ← counts per status
//! GET    /tickets?skip=&limit=&status=     ← page of tickets + counts
//! GET    /ticket/{id}                      ← single ticket
//! PUT    /ticket/{id}                      ← resolve
//! DELETE /ticket/{id}                      ← soft delete
//! GET    /ticket/{id}/message              ← source message
//! GET    /ticket/{id}/context-messages     ← context messages
//! GET    /message/{id}                     ← single message
//! ```

use triage_models::{MessageId, TicketId};

/// Central authority for all backend paths.
///
/// # Examples
///
/// ```
/// use triage_models::TicketId;
/// use triage_sdk::Endpoints;
///
/// let id = TicketId::new("42");
/// assert_eq!(Endpoints::ticket(&id), "/ticket/42");
/// assert_eq!(
///     Endpoints::ticket_context_messages(&id),
///     "/ticket/42/context-messages",
/// );
/// ```
pub struct Endpoints;

impl Endpoints {
    /// Liveness probe.
    pub fn health() -> &'static str {
        "/healthz"
    }

    /// Counts per status.
    pub fn stats() -> &'static str {
        "/stats"
    }

    /// Paged ticket listing. Query: `skip`, `limit`, `status`.
    pub fn tickets() -> &'static str {
        "/tickets"
    }

    /// A single ticket; also the target of resolve (`PUT`) and delete (`DELETE`).
    pub fn ticket(id: &TicketId) -> String {
        format!("/ticket/{id}")
    }

    /// Source message of a ticket.
    pub fn ticket_message(id: &TicketId) -> String {
        format!("/ticket/{id}/message")
    }

    /// Context messages of a ticket.
    pub fn ticket_context_messages(id: &TicketId) -> String {
        format!("/ticket/{id}/context-messages")
    }

    /// A single message.
    pub fn message(id: &MessageId) -> String {
        format!("/message/{id}")
    }
}
