//! Test fixtures: ticket builders and an in-memory backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use triage_models::{
    Author, DashboardLocation, Message, MessageId, Ticket, TicketCounts, TicketId, TicketPage,
    TicketStatus, PAGE_SIZE,
};
use triage_sdk::{SdkError, TicketApi};

use crate::executor;
use crate::view::{Command, TicketsView};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 5, 4, 10, 0, 0).unwrap()
}

pub fn message(id: &str) -> Message {
    Message {
        id: MessageId::new(id),
        channel_id: Some("c-1".into()),
        parent_channel_id: None,
        community_server_id: None,
        timestamp: Some(base_time()),
        has_attachment: false,
        reference_msg_id: None,
        timestamp_insert: base_time(),
        discussion_id: None,
        author_id: Some("a-1".into()),
        content: format!("content of {id}"),
        msg_url: format!("https://chat.example.com/{id}"),
        author: Author::new("Alice", false),
    }
}

/// A ticket with its source message embedded, as `/tickets` returns it.
pub fn ticket(id: &str, status: TicketStatus) -> Ticket {
    Ticket {
        message: Some(message(&format!("m-{id}"))),
        ..bare_ticket(id, status)
    }
}

/// A ticket without an embedded source message.
pub fn bare_ticket(id: &str, status: TicketStatus) -> Ticket {
    Ticket {
        id: TicketId::new(id),
        msg_id: MessageId::new(&format!("m-{id}")),
        status,
        resolved_by: None,
        ts_last_status_change: None,
        timestamp: base_time(),
        context_messages: vec![
            MessageId::new(&format!("c1-{id}")),
            MessageId::new(&format!("c2-{id}")),
        ],
        message: None,
    }
}

/// `t01`, `t02`, ... all open.
pub fn open_tickets(n: usize) -> Vec<Ticket> {
    (1..=n)
        .map(|i| ticket(&format!("t{i:02}"), TicketStatus::Open))
        .collect()
}

/// In-memory backend with the same filtering and paging as the real one.
/// Records one line per call.
#[derive(Default)]
pub struct FakeBackend {
    tickets: Mutex<Vec<Ticket>>,
    calls: Mutex<Vec<String>>,
    fail_mutations: AtomicBool,
}

impl FakeBackend {
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Mutex::new(tickets),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Make every later resolve/delete answer 500.
    pub fn fail_mutations(&self) {
        self.fail_mutations.store(true, Ordering::SeqCst);
    }

    /// The page the backend would serve for `location`, without recording a
    /// call.
    pub fn page(&self, location: DashboardLocation) -> Option<TicketPage> {
        let page = self.listing(location.skip(PAGE_SIZE), PAGE_SIZE, location.tab);
        (!page.tickets.is_empty()).then_some(page)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn counts(tickets: &[Ticket]) -> TicketCounts {
        let count = |s| tickets.iter().filter(|t| t.is(s)).count();
        TicketCounts::new(
            count(TicketStatus::Open),
            count(TicketStatus::Resolved),
            count(TicketStatus::Deleted),
        )
    }

    fn listing(&self, skip: usize, limit: usize, status: TicketStatus) -> TicketPage {
        let tickets = self.tickets.lock().unwrap();
        TicketPage {
            tickets: tickets
                .iter()
                .filter(|t| t.is(status))
                .skip(skip)
                .take(limit)
                .cloned()
                .collect(),
            total_tickets: Self::counts(&tickets),
        }
    }

    fn find(&self, id: &TicketId) -> Result<Ticket, SdkError> {
        self.tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    fn mutate(&self, id: &TicketId, status: TicketStatus) -> Result<(), SdkError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(SdkError::Status {
                status: 500,
                body: "internal error".into(),
            });
        }
        let mut tickets = self.tickets.lock().unwrap();
        let ticket = tickets
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| not_found(id))?;
        ticket.mark(status, base_time() + Duration::hours(1));
        Ok(())
    }
}

fn not_found(id: &TicketId) -> SdkError {
    SdkError::Status {
        status: 404,
        body: format!("ticket {id} not found"),
    }
}

#[async_trait]
impl TicketApi for FakeBackend {
    async fn get_statistics(&self) -> Result<TicketCounts, SdkError> {
        self.record("stats".into());
        Ok(Self::counts(&self.tickets.lock().unwrap()))
    }

    async fn get_tickets(
        &self,
        skip: usize,
        limit: usize,
        status: TicketStatus,
    ) -> Result<TicketPage, SdkError> {
        self.record(format!("tickets skip={skip} limit={limit} status={status}"));
        Ok(self.listing(skip, limit, status))
    }

    async fn get_ticket_message(&self, id: &TicketId) -> Result<Message, SdkError> {
        self.record(format!("message {id}"));
        let ticket = self.find(id)?;
        Ok(message(ticket.msg_id.as_str()))
    }

    async fn get_ticket_context_messages_by_id(
        &self,
        id: &TicketId,
    ) -> Result<Vec<Message>, SdkError> {
        self.record(format!("context {id}"));
        let ticket = self.find(id)?;
        Ok(ticket
            .context_messages
            .iter()
            .map(|m| message(m.as_str()))
            .collect())
    }

    async fn resolve_ticket_by_id(&self, id: &TicketId) -> Result<(), SdkError> {
        self.record(format!("resolve {id}"));
        self.mutate(id, TicketStatus::Resolved)
    }

    async fn delete_ticket_by_id(&self, id: &TicketId) -> Result<(), SdkError> {
        self.record(format!("delete {id}"));
        self.mutate(id, TicketStatus::Deleted)
    }
}

/// Run `commands` and everything they lead to, one at a time in issue order,
/// until the view stops asking for more.
pub async fn settle(view: &mut TicketsView, api: &FakeBackend, commands: Vec<Command>) {
    let mut queue: VecDeque<Command> = commands.into();
    while let Some(command) = queue.pop_front() {
        let event = executor::execute(api, command).await;
        queue.extend(view.apply(event));
    }
}
