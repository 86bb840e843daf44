//! Maintenance request records
//!
//! Request records arrive as loosely-typed JSON objects. Nothing is
//! mandatory: every accessor tolerates absence and the display helpers
//! substitute a placeholder.

mod date;
mod record;
mod status;

pub use date::{format_date, parse_date};
pub use record::{RequestRecord, PLACEHOLDER};
pub use status::{Color, RequestStatus};
