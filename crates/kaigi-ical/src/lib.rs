//! iCalendar (RFC 5545) document generation for Kaigi meetings.
//!
//! Generation only: inbound parsing is out of scope. The crate turns a
//! [`kaigi_core::meeting::Meeting`] into the calendar documents the
//! mail subsystem attaches to invitation, update, and cancellation
//! emails, and translates the internal recurrence model into RRULE
//! syntax.

pub mod build;
pub mod builder;
pub mod core;
pub mod error;
pub mod rrule;
pub mod timezone;

pub use builder::{DocumentIntent, build_document};
pub use error::{IcalError, IcalResult};
