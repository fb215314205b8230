//! The backend operations the dashboard depends on.
//!
//! The dashboard talks to the backend only through [`TicketApi`]. The
//! production implementation is [`TriageClient`]; tests substitute an
//! in-memory backend.

use async_trait::async_trait;
use triage_models::{Message, TicketCounts, TicketId, TicketPage, TicketStatus};

use crate::client::TriageClient;
use crate::error::SdkError;

/// Backend operations used by the ticket dashboard.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// Number of tickets in each status.
    async fn get_statistics(&self) -> Result<TicketCounts, SdkError>;

    /// At most `limit` tickets in `status` after skipping `skip`, with the
    /// totals for every status.
    async fn get_tickets(
        &self,
        skip: usize,
        limit: usize,
        status: TicketStatus,
    ) -> Result<TicketPage, SdkError>;

    /// The message that raised a ticket.
    async fn get_ticket_message(&self, id: &TicketId) -> Result<Message, SdkError>;

    /// Every context message of a ticket.
    async fn get_ticket_context_messages_by_id(
        &self,
        id: &TicketId,
    ) -> Result<Vec<Message>, SdkError>;

    /// Mark a ticket resolved.
    async fn resolve_ticket_by_id(&self, id: &TicketId) -> Result<(), SdkError>;

    /// Soft-delete a ticket.
    async fn delete_ticket_by_id(&self, id: &TicketId) -> Result<(), SdkError>;
}

#[async_trait]
impl TicketApi for TriageClient {
    async fn get_statistics(&self) -> Result<TicketCounts, SdkError> {
        TriageClient::get_statistics(self).await
    }

    async fn get_tickets(
        &self,
        skip: usize,
        limit: usize,
        status: TicketStatus,
    ) -> Result<TicketPage, SdkError> {
        TriageClient::get_tickets(self, skip, limit, status).await
    }

    async fn get_ticket_message(&self, id: &TicketId) -> Result<Message, SdkError> {
        TriageClient::get_ticket_message(self, id).await
    }

    async fn get_ticket_context_messages_by_id(
        &self,
        id: &TicketId,
    ) -> Result<Vec<Message>, SdkError> {
        TriageClient::get_ticket_context_messages_by_id(self, id).await
    }

    async fn resolve_ticket_by_id(&self, id: &TicketId) -> Result<(), SdkError> {
        TriageClient::resolve_ticket_by_id(self, id).await
    }

    async fn delete_ticket_by_id(&self, id: &TicketId) -> Result<(), SdkError> {
        TriageClient::delete_ticket_by_id(self, id).await
    }
}
