//! Tickets and pages of tickets.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::{Message, MessageId};
use crate::status::{TicketCounts, TicketStatus};

// ---------------------------------------------------------------------------
// TicketId
// ---------------------------------------------------------------------------

/// Backend identifier of a ticket.
///
/// # Examples
///
/// ```
/// use triage_models::TicketId;
///
/// let id: TicketId = "42".parse().unwrap();
/// assert_eq!(id.as_str(), "42");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketId(String);

impl TicketId {
    /// Create a new ticket identifier.
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TicketId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for TicketId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// A unit of moderation work raised from a chat message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ticket {
    /// Backend identifier.
    pub id: TicketId,
    /// The message that raised the ticket.
    pub msg_id: MessageId,
    /// Current lifecycle status.
    pub status: TicketStatus,
    /// Moderator who resolved the ticket, if any.
    #[serde(default)]
    pub resolved_by: Option<String>,
    /// When the status last changed. `None` until the first resolve/delete.
    #[serde(default, with = "crate::timestamp::option")]
    pub ts_last_status_change: Option<DateTime<Utc>>,
    /// When the ticket was created.
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Identifiers of the messages giving context to the ticket.
    #[serde(default)]
    pub context_messages: Vec<MessageId>,
    /// The source message, when the backend joins it into the listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl Ticket {
    /// When the ticket last changed status, falling back to its creation time.
    pub fn status_changed_at(&self) -> DateTime<Utc> {
        self.ts_last_status_change.unwrap_or(self.timestamp)
    }

    /// Whether the ticket is already in `status`.
    pub fn is(&self, status: TicketStatus) -> bool {
        self.status == status
    }

    /// Record a status change made at `at`.
    pub fn mark(&mut self, status: TicketStatus, at: DateTime<Utc>) {
        self.status = status;
        self.ts_last_status_change = Some(at);
    }
}

// ---------------------------------------------------------------------------
// TicketPage
// ---------------------------------------------------------------------------

/// One page of tickets for a status, together with the backend's totals for
/// every status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TicketPage {
    /// Tickets in backend order.
    pub tickets: Vec<Ticket>,
    /// Totals per status at the time of the request.
    #[serde(rename = "totalTickets")]
    pub total_tickets: TicketCounts,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
