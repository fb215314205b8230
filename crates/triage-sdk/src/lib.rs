//! # Triage SDK
//!
//! Client for the ticket triage backend.
//!
//! The SDK provides:
//!
//! * [`TriageClient`]: reqwest-based client for every backend route.
//! * [`TicketApi`]: the operations the dashboard needs, as a trait so the
//!   client can be injected (and replaced in tests).
//! * [`Endpoints`]: canonical route paths shared by the client and tooling.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use triage_models::{TicketStatus, PAGE_SIZE};
//! use triage_sdk::TriageClient;
//!
//! # async fn run() -> Result<(), triage_sdk::SdkError> {
//! let client = TriageClient::new("http://127.0.0.1:5001")?;
//!
//! let counts = client.get_statistics().await?;
//! let page = client.get_tickets(0, PAGE_SIZE, TicketStatus::Open).await?;
//! println!("{} open, showing {}", counts.open, page.tickets.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod endpoints;
pub mod error;

pub use api::TicketApi;
pub use client::TriageClient;
pub use endpoints::Endpoints;
pub use error::SdkError;
