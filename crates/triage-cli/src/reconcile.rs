//! Ticket list reconciliation.
//!
//! After a resolve or delete the affected ticket leaves the active tab. The
//! page is patched in memory instead of being refetched: the ticket is
//! removed, the counts are adjusted, and when more tickets exist beyond the
//! page a single replacement is fetched to keep it full.
//!
//! Everything here is a pure function of the current [`PageState`]. Side
//! effects are returned as a [`FollowUp`] for the caller to execute.

use triage_models::{
    DashboardLocation, Ticket, TicketCounts, TicketId, TicketPage, TicketStatus, PAGE_SIZE,
};

/// The page on screen together with the totals it was rendered against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub location: DashboardLocation,
    pub tickets: Vec<Ticket>,
    pub counts: TicketCounts,
}

/// A ticket the backend has moved to a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub ticket_id: TicketId,
    pub to: TicketStatus,
}

/// Work left for the caller after a reconciliation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Fetch the single ticket at `skip` in `location.tab` and hand it to
    /// [`apply_replacement`] tagged with `location`.
    FetchReplacement {
        location: DashboardLocation,
        skip: usize,
    },
    /// The page emptied out; show this one instead.
    ShowPage(DashboardLocation),
}

/// Remove a ticket that changed status from the page.
///
/// Tickets that are not on the page, or that already have the new status,
/// leave the state untouched.
pub fn reconcile(mut state: PageState, change: &StatusChange) -> (PageState, Option<FollowUp>) {
    let Some(index) = state
        .tickets
        .iter()
        .position(|t| t.id == change.ticket_id)
    else {
        return (state, None);
    };
    if state.tickets[index].is(change.to) {
        return (state, None);
    }

    let len_before = state.tickets.len();
    let tab_total_before = state.counts.get(state.location.tab);

    let removed = state.tickets.remove(index);
    state.counts.transfer(removed.status, change.to);

    if len_before == 1 {
        let follow_up = (state.location.page > 1)
            .then(|| FollowUp::ShowPage(state.location.with_page(state.location.page - 1)));
        return (state, follow_up);
    }

    let skip = state.location.skip(PAGE_SIZE) + (len_before - 1);
    let follow_up = (skip + 1 < tab_total_before).then_some(FollowUp::FetchReplacement {
        location: state.location,
        skip,
    });
    (state, follow_up)
}

/// Append a replacement fetched for `requested_for`.
///
/// The backend's totals in `page` are ignored: they may already include
/// mutations whose completion has not been reconciled yet. The replacement is
/// dropped when
///
/// * the view has moved to another location,
/// * the page is already full, or holds every ticket the counts allow,
/// * the ticket is already on the page, or
/// * the ticket no longer belongs to the tab.
pub fn apply_replacement(
    mut state: PageState,
    requested_for: DashboardLocation,
    page: TicketPage,
) -> PageState {
    if state.location != requested_for {
        return state;
    }
    let Some(ticket) = page.tickets.into_iter().next() else {
        return state;
    };

    let remaining = state
        .counts
        .get(state.location.tab)
        .saturating_sub(state.location.skip(PAGE_SIZE));
    let capacity = PAGE_SIZE.min(remaining);

    if state.tickets.len() >= capacity
        || state.tickets.iter().any(|t| t.id == ticket.id)
        || !ticket.is(state.location.tab)
    {
        return state;
    }
    state.tickets.push(ticket);
    state
}

/// Replace the page wholesale with a fresh listing for `location`.
///
/// Listings for a location the view has left are dropped.
pub fn load_page(mut state: PageState, location: DashboardLocation, page: TicketPage) -> PageState {
    if state.location != location {
        return state;
    }
    state.tickets = page.tickets;
    state.counts = page.total_tickets;
    state
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
