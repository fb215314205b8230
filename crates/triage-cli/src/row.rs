//! Per-ticket UI state.
//!
//! A [`TicketRow`] lives as long as its ticket is on screen. It caches the
//! ticket's context messages after the first expansion and guards the
//! resolve / delete actions.

use tracing::debug;
use triage_models::{Message, Ticket, TicketId, TicketStatus};

use crate::view::Command;

/// Status change a moderator can apply to a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Resolve,
    Delete,
}

impl Mutation {
    /// Status the ticket ends up in.
    pub fn target(self) -> TicketStatus {
        match self {
            Mutation::Resolve => TicketStatus::Resolved,
            Mutation::Delete => TicketStatus::Deleted,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Mutation::Resolve => "resolve",
            Mutation::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ContextState {
    #[default]
    NotRequested,
    Loading,
    Loaded,
}

#[derive(Debug, Default)]
pub struct TicketRow {
    shown: bool,
    context: ContextState,
    context_messages: Vec<Message>,
    message: Option<Message>,
    message_requested: bool,
    pending: Option<Mutation>,
}

impl TicketRow {
    /// Whether `mutation` would change the ticket at all.
    pub fn can_apply(ticket: &Ticket, mutation: Mutation) -> bool {
        !ticket.is(mutation.target())
    }

    // ------------------------------------------------------------------
    // Context messages
    // ------------------------------------------------------------------

    /// Show or hide the context messages. The first time they are shown,
    /// returns the command that fetches them.
    pub fn toggle_context(&mut self, ticket_id: &TicketId) -> Option<Command> {
        self.shown = !self.shown;
        if self.shown && self.context == ContextState::NotRequested {
            self.context = ContextState::Loading;
            return Some(Command::LoadContextMessages(ticket_id.clone()));
        }
        None
    }

    /// Record the outcome of a context fetch. A failed fetch may be retried
    /// by toggling again.
    pub fn finish_context(&mut self, result: Result<Vec<Message>, String>) -> Result<(), String> {
        match result {
            Ok(messages) => {
                self.context_messages.extend(messages);
                self.context = ContextState::Loaded;
                Ok(())
            }
            Err(e) => {
                self.context = ContextState::NotRequested;
                Err(e)
            }
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_loading_context(&self) -> bool {
        self.context == ContextState::Loading
    }

    pub fn context_messages(&self) -> &[Message] {
        &self.context_messages
    }

    // ------------------------------------------------------------------
    // Source message
    // ------------------------------------------------------------------

    /// Returns the fetch command when the listing did not embed the ticket's
    /// source message and it has not been requested yet.
    pub fn request_message(&mut self, ticket: &Ticket) -> Option<Command> {
        if ticket.message.is_some() || self.message_requested {
            return None;
        }
        self.message_requested = true;
        Some(Command::LoadTicketMessage(ticket.id.clone()))
    }

    pub fn finish_message(&mut self, result: Result<Message, String>) -> Result<(), String> {
        self.message = Some(result?);
        Ok(())
    }

    /// The source message, embedded or fetched.
    pub fn message<'a>(&'a self, ticket: &'a Ticket) -> Option<&'a Message> {
        ticket.message.as_ref().or(self.message.as_ref())
    }

    // ------------------------------------------------------------------
    // Resolve / delete
    // ------------------------------------------------------------------

    /// Returns the command applying `mutation`, or `None` when the ticket is
    /// already in the target status or another mutation is in flight.
    pub fn request_mutation(&mut self, ticket: &Ticket, mutation: Mutation) -> Option<Command> {
        if !Self::can_apply(ticket, mutation) {
            debug!(ticket = %ticket.id, status = %ticket.status, "{} disabled", mutation.verb());
            return None;
        }
        if let Some(pending) = self.pending {
            debug!(ticket = %ticket.id, pending = pending.verb(), "mutation already in flight");
            return None;
        }
        self.pending = Some(mutation);
        Some(Command::Mutate {
            ticket_id: ticket.id.clone(),
            mutation,
        })
    }

    pub fn finish_mutation(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<Mutation> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bare_ticket, message, ticket};

    #[test]
    fn first_expansion_fetches_context() {
        let t = ticket("t1", TicketStatus::Open);
        let mut row = TicketRow::default();

        assert_eq!(
            row.toggle_context(&t.id),
            Some(Command::LoadContextMessages(t.id.clone()))
        );
        assert!(row.is_shown());
        assert!(row.is_loading_context());
    }

    #[test]
    fn toggling_again_never_refetches() {
        let t = ticket("t1", TicketStatus::Open);
        let mut row = TicketRow::default();

        let mut fetches = 0;
        fetches += usize::from(row.toggle_context(&t.id).is_some());
        row.finish_context(Ok(vec![message("c1"), message("c2")]))
            .unwrap();
        for _ in 0..4 {
            fetches += usize::from(row.toggle_context(&t.id).is_some());
        }

        assert_eq!(fetches, 1);
        assert!(row.is_shown());
        assert_eq!(row.context_messages().len(), 2);
    }

    #[test]
    fn closing_before_reply_does_not_refetch() {
        let t = ticket("t1", TicketStatus::Open);
        let mut row = TicketRow::default();
        assert!(row.toggle_context(&t.id).is_some());
        assert!(row.toggle_context(&t.id).is_none());
        assert!(row.toggle_context(&t.id).is_none());
        assert!(row.is_loading_context());
    }

    #[test]
    fn hiding_keeps_cache() {
        let t = ticket("t1", TicketStatus::Open);
        let mut row = TicketRow::default();
        row.toggle_context(&t.id);
        row.finish_context(Ok(vec![message("c1")])).unwrap();
        row.toggle_context(&t.id);
        assert!(!row.is_shown());
        assert_eq!(row.context_messages().len(), 1);
    }

    #[test]
    fn failed_context_fetch_can_be_retried() {
        let t = ticket("t1", TicketStatus::Open);
        let mut row = TicketRow::default();
        row.toggle_context(&t.id);
        assert!(row.finish_context(Err("boom".into())).is_err());
        row.toggle_context(&t.id);
        assert!(row.toggle_context(&t.id).is_some());
    }

    #[test]
    fn mutation_disabled_when_already_in_target_status() {
        let resolved = ticket("t1", TicketStatus::Resolved);
        let deleted = ticket("t2", TicketStatus::Deleted);
        let mut row = TicketRow::default();

        assert_eq!(row.request_mutation(&resolved, Mutation::Resolve), None);
        assert_eq!(row.request_mutation(&deleted, Mutation::Delete), None);
        assert!(row.pending().is_none());
        assert!(TicketRow::can_apply(&resolved, Mutation::Delete));
        assert!(TicketRow::can_apply(&deleted, Mutation::Resolve));
    }

    #[test]
    fn one_mutation_in_flight_at_a_time() {
        let t = ticket("t1", TicketStatus::Open);
        let mut row = TicketRow::default();

        assert!(matches!(
            row.request_mutation(&t, Mutation::Resolve),
            Some(Command::Mutate { mutation: Mutation::Resolve, .. })
        ));
        assert_eq!(row.request_mutation(&t, Mutation::Delete), None);

        row.finish_mutation();
        assert!(row.request_mutation(&t, Mutation::Delete).is_some());
    }

    #[test]
    fn missing_source_message_requested_once() {
        let t = bare_ticket("t1", TicketStatus::Open);
        let mut row = TicketRow::default();

        assert_eq!(
            row.request_message(&t),
            Some(Command::LoadTicketMessage(t.id.clone()))
        );
        assert_eq!(row.request_message(&t), None);
        assert!(row.message(&t).is_none());

        row.finish_message(Ok(message("m-t1"))).unwrap();
        assert_eq!(row.message(&t).map(|m| m.id.as_str()), Some("m-t1"));
    }

    #[test]
    fn embedded_source_message_needs_no_fetch() {
        let t = ticket("t1", TicketStatus::Open);
        let mut row = TicketRow::default();
        assert_eq!(row.request_message(&t), None);
        assert!(row.message(&t).is_some());
    }
}
