//! Core types for eventcal.
//!
//! - `recurrence` expands a recurring event into concrete instances
//! - `conflict` finds events that double-book a time slot
//! - `store` holds a session's events and applies add/update/move/delete
//! - `persist` and `config` read and write the on-disk files

pub mod config;
pub mod conflict;
pub mod constants;
pub mod error;
pub mod event;
pub mod persist;
pub mod recurrence;
pub mod store;

pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventFormData, EventUpdate};
pub use recurrence::{RecurrenceKind, RecurrencePattern};
pub use store::{DeletionScope, EventStore};
