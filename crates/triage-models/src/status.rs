//! Ticket lifecycle status and per-status counters.
//!
//! A ticket starts `open` and leaves that state only through a resolve or a
//! delete. The dashboard shows one tab per status, each labelled with the
//! number of tickets the backend holds in that status ([`TicketCounts`]).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a ticket.
///
/// Serialized in lowercase, matching the backend (`"open"`, `"resolved"`,
/// `"deleted"`).
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketStatus {
    /// The ticket still needs attention.
    #[default]
    Open,
    /// A moderator handled the ticket.
    Resolved,
    /// The ticket was dismissed (soft delete on the backend).
    Deleted,
}

impl TicketStatus {
    /// All statuses, in tab order.
    pub const ALL: [TicketStatus; 3] = [Self::Open, Self::Resolved, Self::Deleted];

    /// Parse a status, reporting failures as [`ModelError::InvalidStatus`].
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        Self::from_str(value).map_err(|_| ModelError::InvalidStatus {
            value: value.to_string(),
        })
    }

    /// Capitalized label used for tabs and status chips.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Resolved => "Resolved",
            Self::Deleted => "Deleted",
        }
    }

    /// The status following this one in tab order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Open => Self::Resolved,
            Self::Resolved => Self::Deleted,
            Self::Deleted => Self::Open,
        }
    }

    /// The status preceding this one in tab order, wrapping around.
    pub fn previous(self) -> Self {
        match self {
            Self::Open => Self::Deleted,
            Self::Resolved => Self::Open,
            Self::Deleted => Self::Resolved,
        }
    }
}

// ---------------------------------------------------------------------------
// TicketCounts
// ---------------------------------------------------------------------------

/// Number of tickets the backend holds in each status.
///
/// These are the backend's authoritative totals. The dashboard adjusts them
/// optimistically after a local resolve/delete but never recomputes them from
/// the tickets it happens to display.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicketCounts {
    /// Open tickets.
    #[serde(default)]
    pub open: usize,
    /// Resolved tickets.
    #[serde(default)]
    pub resolved: usize,
    /// Deleted tickets.
    #[serde(default)]
    pub deleted: usize,
}

impl TicketCounts {
    /// Create counts from explicit values.
    pub fn new(open: usize, resolved: usize, deleted: usize) -> Self {
        Self {
            open,
            resolved,
            deleted,
        }
    }

    /// Count for a single status.
    pub fn get(&self, status: TicketStatus) -> usize {
        match status {
            TicketStatus::Open => self.open,
            TicketStatus::Resolved => self.resolved,
            TicketStatus::Deleted => self.deleted,
        }
    }

    fn slot_mut(&mut self, status: TicketStatus) -> &mut usize {
        match status {
            TicketStatus::Open => &mut self.open,
            TicketStatus::Resolved => &mut self.resolved,
            TicketStatus::Deleted => &mut self.deleted,
        }
    }

    /// Record one ticket moving from `from` to `to`.
    ///
    /// A transition to the same status leaves the counts untouched.
    pub fn transfer(&mut self, from: TicketStatus, to: TicketStatus) {
        if from == to {
            return;
        }
        let source = self.slot_mut(from);
        *source = source.saturating_sub(1);
        *self.slot_mut(to) += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
