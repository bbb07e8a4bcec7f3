//! iCalendar serialization (RFC 5545).
//!
//! This module provides serializers for iCalendar content:
//! - Escape: Text and parameter value escaping
//! - Fold: Content line folding at 75 octets
//! - Serialize: Full document serialization with CRLF terminators

mod escape;
mod fold;
mod serialize;

pub use escape::{escape_param_value, escape_text};
pub use fold::fold_line;
pub use serialize::{serialize, serialize_component, serialize_property};
