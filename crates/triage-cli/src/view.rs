//! The tickets view: tab and pagination state, the ticket list, and the
//! orchestration of backend requests.
//!
//! The view never performs I/O. User input and backend replies go in through
//! its methods; the [`Command`]s that come out are executed elsewhere and
//! their results fed back as [`BackendEvent`]s.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use triage_models::{
    page_count, DashboardLocation, Message, Ticket, TicketCounts, TicketId, TicketPage,
    TicketStatus, PAGE_SIZE,
};

use crate::reconcile::{self, FollowUp, PageState, StatusChange};
use crate::row::{Mutation, TicketRow};

/// A backend request the view wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadStatistics,
    LoadPage(DashboardLocation),
    LoadReplacement {
        location: DashboardLocation,
        skip: usize,
    },
    LoadTicketMessage(TicketId),
    LoadContextMessages(TicketId),
    Mutate {
        ticket_id: TicketId,
        mutation: Mutation,
    },
}

/// The outcome of a [`Command`]. Errors are carried as display strings.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    StatisticsLoaded(Result<TicketCounts, String>),
    PageLoaded {
        location: DashboardLocation,
        result: Result<TicketPage, String>,
    },
    ReplacementLoaded {
        location: DashboardLocation,
        result: Result<TicketPage, String>,
    },
    TicketMessageLoaded {
        ticket_id: TicketId,
        result: Result<Message, String>,
    },
    ContextMessagesLoaded {
        ticket_id: TicketId,
        result: Result<Vec<Message>, String>,
    },
    MutationFinished {
        ticket_id: TicketId,
        mutation: Mutation,
        result: Result<(), String>,
    },
}

pub struct TicketsView {
    page: PageState,
    loaded: bool,
    /// Location requested on startup, resolved once the counts arrive.
    pending_location: Option<String>,
    rows: HashMap<TicketId, TicketRow>,
    selected: usize,
    notice: Option<String>,
}

impl TicketsView {
    /// Create the view and the commands that populate it.
    ///
    /// A requested location can only be range-checked against the totals, so
    /// it is held back until the statistics are in.
    pub fn new(requested: Option<&str>) -> (Self, Vec<Command>) {
        let mut view = Self {
            page: PageState::default(),
            loaded: false,
            pending_location: requested.map(str::to_string),
            rows: HashMap::new(),
            selected: 0,
            notice: None,
        };
        let commands = if view.pending_location.is_some() {
            vec![Command::LoadStatistics]
        } else {
            view.navigate(DashboardLocation::default())
        };
        (view, commands)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn location(&self) -> DashboardLocation {
        self.page.location
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.page.tickets
    }

    pub fn counts(&self) -> TicketCounts {
        self.page.counts
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn row(&self, id: &TicketId) -> Option<&TicketRow> {
        self.rows.get(id)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Number of pages in the current tab.
    pub fn page_count(&self) -> usize {
        page_count(self.page.counts.get(self.page.location.tab), PAGE_SIZE)
    }

    pub fn has_previous_page(&self) -> bool {
        self.page.location.page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page.location.page * PAGE_SIZE < self.page.counts.get(self.page.location.tab)
    }

    /// Hand the most recent notice to the caller, clearing it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn select_tab(&mut self, tab: TicketStatus) -> Vec<Command> {
        self.pending_location = None;
        let target = DashboardLocation::first_page(tab);
        if target == self.page.location && self.loaded {
            return Vec::new();
        }
        self.navigate(target)
    }

    /// Go to `page` of the current tab. Pages outside the tab are ignored.
    pub fn select_page(&mut self, page: usize) -> Vec<Command> {
        let last = self.page_count().max(1);
        if !(1..=last).contains(&page) || page == self.page.location.page {
            return Vec::new();
        }
        self.navigate(self.page.location.with_page(page))
    }

    pub fn next_page(&mut self) -> Vec<Command> {
        if !self.has_next_page() {
            return Vec::new();
        }
        self.select_page(self.page.location.page + 1)
    }

    pub fn previous_page(&mut self) -> Vec<Command> {
        if !self.has_previous_page() {
            return Vec::new();
        }
        self.select_page(self.page.location.page - 1)
    }

    pub fn first_page(&mut self) -> Vec<Command> {
        self.select_page(1)
    }

    pub fn last_page(&mut self) -> Vec<Command> {
        self.select_page(self.page_count().max(1))
    }

    /// Refetch the current page.
    pub fn reload(&mut self) -> Vec<Command> {
        if self.pending_location.is_some() {
            return vec![Command::LoadStatistics];
        }
        self.navigate(self.page.location)
    }

    fn navigate(&mut self, location: DashboardLocation) -> Vec<Command> {
        info!(%location, "navigating");
        self.page.location = location;
        self.loaded = false;
        self.selected = 0;
        vec![Command::LoadPage(location)]
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.page.tickets.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.page.tickets.len().saturating_sub(1));
    }

    // ------------------------------------------------------------------
    // Row actions
    // ------------------------------------------------------------------

    /// Show or hide the context messages of the ticket at `index`.
    pub fn toggle_context(&mut self, index: usize) -> Vec<Command> {
        let Some(ticket) = self.page.tickets.get(index).filter(|_| self.loaded) else {
            return Vec::new();
        };
        self.rows
            .entry(ticket.id.clone())
            .or_default()
            .toggle_context(&ticket.id)
            .into_iter()
            .collect()
    }

    /// Resolve or delete the ticket at `index`. Ignored while a page loads.
    pub fn request_mutation(&mut self, index: usize, mutation: Mutation) -> Vec<Command> {
        let Some(ticket) = self.page.tickets.get(index).filter(|_| self.loaded) else {
            return Vec::new();
        };
        self.rows
            .entry(ticket.id.clone())
            .or_default()
            .request_mutation(ticket, mutation)
            .into_iter()
            .collect()
    }

    // ------------------------------------------------------------------
    // Backend replies
    // ------------------------------------------------------------------

    pub fn apply(&mut self, event: BackendEvent) -> Vec<Command> {
        match event {
            BackendEvent::StatisticsLoaded(result) => self.on_statistics(result),
            BackendEvent::PageLoaded { location, result } => self.on_page(location, result),
            BackendEvent::ReplacementLoaded { location, result } => match result {
                Ok(_) if !self.loaded => {
                    debug!(%location, "dropping replacement during navigation");
                    Vec::new()
                }
                Ok(page) => {
                    let state = std::mem::take(&mut self.page);
                    self.page = reconcile::apply_replacement(state, location, page);
                    self.message_requests()
                }
                Err(e) => {
                    self.notify(format!("Could not load replacement ticket: {e}"));
                    Vec::new()
                }
            },
            BackendEvent::TicketMessageLoaded { ticket_id, result } => {
                if let Some(row) = self.rows.get_mut(&ticket_id) {
                    if let Err(e) = row.finish_message(result) {
                        self.notify(format!("Could not load message of ticket {ticket_id}: {e}"));
                    }
                }
                Vec::new()
            }
            BackendEvent::ContextMessagesLoaded { ticket_id, result } => {
                if let Some(row) = self.rows.get_mut(&ticket_id) {
                    if let Err(e) = row.finish_context(result) {
                        self.notify(format!(
                            "Could not load context of ticket {ticket_id}: {e}"
                        ));
                    }
                }
                Vec::new()
            }
            BackendEvent::MutationFinished {
                ticket_id,
                mutation,
                result,
            } => self.on_mutation(ticket_id, mutation, result),
        }
    }

    fn on_statistics(&mut self, result: Result<TicketCounts, String>) -> Vec<Command> {
        let requested = self.pending_location.take();
        match result {
            Ok(counts) => {
                self.page.counts = counts;
                let location = requested
                    .as_deref()
                    .map(|r| DashboardLocation::resolve(r, &counts))
                    .unwrap_or_default();
                if let Some(r) = requested.as_deref() {
                    if r != location.to_string() {
                        debug!(requested = r, resolved = %location, "location corrected");
                    }
                }
                self.navigate(location)
            }
            Err(e) => {
                self.notify(format!("Could not load statistics: {e}"));
                self.navigate(DashboardLocation::default())
            }
        }
    }

    fn on_page(
        &mut self,
        location: DashboardLocation,
        result: Result<TicketPage, String>,
    ) -> Vec<Command> {
        if location != self.page.location {
            debug!(%location, current = %self.page.location, "dropping stale page");
            return Vec::new();
        }
        match result {
            Ok(page) => {
                let state = std::mem::take(&mut self.page);
                self.page = reconcile::load_page(state, location, page);
                self.loaded = true;
                let visible: Vec<TicketId> =
                    self.page.tickets.iter().map(|t| t.id.clone()).collect();
                self.rows.retain(|id, _| visible.contains(id));
                self.clamp_selection();
                self.message_requests()
            }
            Err(e) => {
                self.notify(format!("Could not load {location}: {e}"));
                Vec::new()
            }
        }
    }

    fn on_mutation(
        &mut self,
        ticket_id: TicketId,
        mutation: Mutation,
        result: Result<(), String>,
    ) -> Vec<Command> {
        if let Some(row) = self.rows.get_mut(&ticket_id) {
            row.finish_mutation();
        }
        if let Err(e) = result {
            self.notify(format!("Could not {} ticket {ticket_id}: {e}", mutation.verb()));
            return Vec::new();
        }

        self.notify(format!("Ticket {ticket_id} {}d", mutation.verb()));

        // The list on hand belongs to a page being replaced; the pending
        // listing carries the backend's counts.
        if !self.loaded {
            debug!(%ticket_id, location = %self.page.location, "skipping reconcile during navigation");
            self.rows.remove(&ticket_id);
            return Vec::new();
        }

        let change = StatusChange {
            ticket_id: ticket_id.clone(),
            to: mutation.target(),
        };
        let state = std::mem::take(&mut self.page);
        let (state, follow_up) = reconcile::reconcile(state, &change);
        self.page = state;
        self.rows.remove(&ticket_id);
        self.clamp_selection();

        match follow_up {
            Some(FollowUp::FetchReplacement { location, skip }) => {
                vec![Command::LoadReplacement { location, skip }]
            }
            Some(FollowUp::ShowPage(location)) => self.navigate(location),
            None => Vec::new(),
        }
    }

    /// Fetch the source message of listed tickets that arrived without one.
    fn message_requests(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        for ticket in &self.page.tickets {
            let row = self.rows.entry(ticket.id.clone()).or_default();
            commands.extend(row.request_message(ticket));
        }
        commands
    }

    fn notify(&mut self, notice: String) {
        warn!(%notice, "dashboard notice");
        self.notice = Some(notice);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
