/// Identity constants shared across crates
pub const PRODUCT_VENDOR: &str = "Kaigi";
pub const PRODUCT_NAME: &str = "Kaigi Meeting Server";

/// PRODID emitted in every generated calendar document.
pub const CALENDAR_PRODID: &str =
    const_str::concat!("-//", PRODUCT_VENDOR, "//", PRODUCT_NAME, "//EN");

/// Default number of occurrences materialized for display when the
/// caller does not request a specific window.
pub const DEFAULT_OCCURRENCE_LIMIT: usize = 60;

/// Minutes before an occurrence start at which the reminder alarm fires.
pub const REMINDER_LEAD_MINUTES: i64 = 10;
