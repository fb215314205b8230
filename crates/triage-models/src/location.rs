//! Dashboard location: which status tab and which page are on screen.
//!
//! The dashboard mirrors its `(tab, page)` state into a location string so a
//! view can be bookmarked and shared:
//!
//! ```text
//! /tickets?tab=open&page=1
//! /tickets?tab=resolved&page=3
//! ```
//!
//! [`DashboardLocation::resolve`] turns an arbitrary, possibly hand-edited
//! location into a valid state, given the current per-status totals.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::status::{TicketCounts, TicketStatus};

/// Number of tickets per dashboard page.
pub const PAGE_SIZE: usize = 20;

/// Path component of every dashboard location.
pub const LOCATION_PATH: &str = "/tickets";

/// Number of pages needed to show `total` tickets, `page_size` at a time.
///
/// ```
/// use triage_models::page_count;
///
/// assert_eq!(page_count(0, 20), 0);
/// assert_eq!(page_count(20, 20), 1);
/// assert_eq!(page_count(21, 20), 2);
/// ```
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size)
}

// ---------------------------------------------------------------------------
// DashboardLocation
// ---------------------------------------------------------------------------

/// The `(tab, page)` pair the dashboard is showing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DashboardLocation {
    /// Status filter applied to the ticket list.
    pub tab: TicketStatus,
    /// 1-based page number.
    pub page: usize,
}

impl Default for DashboardLocation {
    fn default() -> Self {
        Self::first_page(TicketStatus::Open)
    }
}

impl DashboardLocation {
    /// Location of `page` within `tab`.
    pub fn new(tab: TicketStatus, page: usize) -> Self {
        Self { tab, page }
    }

    /// First page of `tab`.
    pub fn first_page(tab: TicketStatus) -> Self {
        Self { tab, page: 1 }
    }

    /// Same tab, different page.
    pub fn with_page(self, page: usize) -> Self {
        Self { page, ..self }
    }

    /// Number of tickets preceding this page.
    pub fn skip(&self, page_size: usize) -> usize {
        self.page.saturating_sub(1) * page_size
    }

    /// Whether the page exists given the current totals.
    pub fn is_within(&self, counts: &TicketCounts, page_size: usize) -> bool {
        (1..=page_count(counts.get(self.tab), page_size)).contains(&self.page)
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("tab", &self.tab.to_string())
            .append_pair("page", &self.page.to_string())
            .finish()
    }

    /// Resolve a requested location against the current totals.
    ///
    /// * Valid tab and in-range page: kept as is.
    /// * Valid tab, missing or out-of-range page: first page of that tab.
    /// * Anything else: first page of `open`.
    ///
    /// ```
    /// use triage_models::{DashboardLocation, TicketCounts, TicketStatus};
    ///
    /// let counts = TicketCounts::new(45, 3, 0);
    /// let loc = DashboardLocation::resolve("/tickets?tab=open&page=3", &counts);
    /// assert_eq!(loc, DashboardLocation::new(TicketStatus::Open, 3));
    ///
    /// let loc = DashboardLocation::resolve("?tab=archived&page=3", &counts);
    /// assert_eq!(loc, DashboardLocation::default());
    /// ```
    pub fn resolve(input: &str, counts: &TicketCounts) -> Self {
        let query = LocationQuery::parse(input);
        let Some(tab) = query.tab.as_deref().and_then(|t| TicketStatus::parse(t).ok()) else {
            return Self::default();
        };
        match query.page.as_deref().and_then(|p| p.parse::<usize>().ok()) {
            Some(page) if Self::new(tab, page).is_within(counts, crate::PAGE_SIZE) => {
                Self::new(tab, page)
            }
            _ => Self::first_page(tab),
        }
    }
}

impl fmt::Display for DashboardLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LOCATION_PATH}?{}", self.query())
    }
}

/// Strict parse: both `tab` and `page` must be present and well-formed.
/// Range checks need totals and belong to [`DashboardLocation::resolve`].
impl FromStr for DashboardLocation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ModelError::InvalidLocation {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let query = LocationQuery::parse(s);
        let tab = query.tab.ok_or_else(|| invalid("missing `tab`"))?;
        let tab = TicketStatus::parse(&tab).map_err(|e| invalid(&e.to_string()))?;
        let page = query.page.ok_or_else(|| invalid("missing `page`"))?;
        let page = page
            .parse::<usize>()
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| invalid("`page` must be a positive integer"))?;
        Ok(Self::new(tab, page))
    }
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// Raw `tab` / `page` values; the first occurrence of each key wins.
#[derive(Debug, Default)]
struct LocationQuery {
    tab: Option<String>,
    page: Option<String>,
}

impl LocationQuery {
    fn parse(input: &str) -> Self {
        let without_fragment = input.split_once('#').map_or(input, |(head, _)| head);
        let query = without_fragment
            .split_once('?')
            .map_or(without_fragment, |(_, q)| q);

        let mut out = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "tab" if out.tab.is_none() => out.tab = Some(value.into_owned()),
                "page" if out.page.is_none() => out.page = Some(value.into_owned()),
                _ => {}
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
