//! Core domain model for the Kaigi meeting scheduler.
//!
//! Holds the recurrence model, meeting records, and the occurrence
//! calculator. Everything here is pure and synchronous; I/O concerns
//! (persistence, transport, document rendering) live in other crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod meeting;
pub mod occurrence;
pub mod recurrence;
pub mod types;
