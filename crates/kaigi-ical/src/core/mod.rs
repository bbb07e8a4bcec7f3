//! iCalendar generation models (RFC 5545).
//!
//! A deliberately small subset of the format: only the components and
//! value shapes the document builder emits. Properties keep insertion
//! order so serialization is deterministic.

mod component;
mod property;

pub use component::{Component, ComponentKind};
pub use property::{Parameter, Property, Value};
