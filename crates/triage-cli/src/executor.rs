//! Runs view [`Command`]s against the backend.
//!
//! Each command becomes one request on its own tokio task. The outcome goes
//! back to the UI loop as an [`Action::Backend`]; nothing here touches view
//! state.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::error;
use triage_models::PAGE_SIZE;
use triage_sdk::{SdkError, TicketApi};

use crate::row::Mutation;
use crate::tui::Action;
use crate::view::{BackendEvent, Command};

/// Execute `command` in the background and report to `tx`.
pub fn spawn(api: Arc<dyn TicketApi>, command: Command, tx: mpsc::UnboundedSender<Action>) {
    tokio::spawn(async move {
        let event = execute(api.as_ref(), command).await;
        // The receiver is gone once the UI has shut down.
        let _ = tx.send(Action::Backend(event));
    });
}

/// Perform the request behind `command`.
pub async fn execute(api: &dyn TicketApi, command: Command) -> BackendEvent {
    match command {
        Command::LoadStatistics => BackendEvent::StatisticsLoaded(
            api.get_statistics()
                .await
                .map_err(|e| report("get_statistics", &e)),
        ),
        Command::LoadPage(location) => BackendEvent::PageLoaded {
            location,
            result: api
                .get_tickets(location.skip(PAGE_SIZE), PAGE_SIZE, location.tab)
                .await
                .map_err(|e| report("get_tickets", &e)),
        },
        Command::LoadReplacement { location, skip } => BackendEvent::ReplacementLoaded {
            location,
            result: api
                .get_tickets(skip, 1, location.tab)
                .await
                .map_err(|e| report("get_tickets", &e)),
        },
        Command::LoadTicketMessage(ticket_id) => {
            let result = api
                .get_ticket_message(&ticket_id)
                .await
                .map_err(|e| report("get_ticket_message", &e));
            BackendEvent::TicketMessageLoaded { ticket_id, result }
        }
        Command::LoadContextMessages(ticket_id) => {
            let result = api
                .get_ticket_context_messages_by_id(&ticket_id)
                .await
                .map_err(|e| report("get_ticket_context_messages_by_id", &e));
            BackendEvent::ContextMessagesLoaded { ticket_id, result }
        }
        Command::Mutate {
            ticket_id,
            mutation,
        } => {
            let result = match mutation {
                Mutation::Resolve => api
                    .resolve_ticket_by_id(&ticket_id)
                    .await
                    .map_err(|e| report("resolve_ticket_by_id", &e)),
                Mutation::Delete => api
                    .delete_ticket_by_id(&ticket_id)
                    .await
                    .map_err(|e| report("delete_ticket_by_id", &e)),
            };
            BackendEvent::MutationFinished {
                ticket_id,
                mutation,
                result,
            }
        }
    }
}

fn report(operation: &str, err: &SdkError) -> String {
    error!(operation, error = %err, "backend request failed");
    err.to_string()
}
