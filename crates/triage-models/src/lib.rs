#![deny(missing_docs)]

//! # Triage Models
//!
//! Core data types for the support-ticket triage dashboard.
//!
//! ## Data hierarchy
//!
//! ```text
//! TicketPage
//! ├── tickets: Vec<Ticket>
//! │   ├── status: TicketStatus (open | resolved | deleted)
//! │   ├── message: Option<Message>
//! │   │   └── author: Author
//! │   └── context_messages: Vec<MessageId>
//! └── total_tickets: TicketCounts
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`status`] | `TicketStatus`, per-status `TicketCounts` |
//! | [`ticket`] | `TicketId`, `Ticket`, `TicketPage` |
//! | [`message`] | `MessageId`, `Message`, `Author` |
//! | [`location`] | Dashboard location (`tab` + `page`) and paging math |
//! | [`timestamp`] | Serde helpers for backend timestamps |

pub mod error;
pub mod location;
pub mod message;
pub mod status;
pub mod ticket;
pub mod timestamp;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `triage_models::Ticket` directly.
pub use error::*;
pub use location::*;
pub use message::*;
pub use status::*;
pub use ticket::*;
