//! Recurrence rule translation (RFC 5545 §3.3.10).
//!
//! Translates the internal recurrence model into RRULE value strings.
//! Translation is best-effort by design: unmappable weekday or monthly
//! codes shrink the rule instead of failing, so a malformed recurrence
//! never blocks sending an invitation.

use chrono::{DateTime, Utc};

use kaigi_core::recurrence::{EndCondition, Frequency, MonthlyPattern, Recurrence};

/// Maps a weekday code (1=Sunday..7=Saturday) to the RFC 5545
/// two-letter day name. Out-of-range codes map to the empty string,
/// signalling "omit".
#[must_use]
pub const fn weekday_code(day: u8) -> &'static str {
    match day {
        1 => "SU",
        2 => "MO",
        3 => "TU",
        4 => "WE",
        5 => "TH",
        6 => "FR",
        7 => "SA",
        _ => "",
    }
}

/// Maps a week-of-month number to an ordinal word for human-readable
/// summaries ("second Tuesday of the month"). Values outside 1-5 fall
/// back to `{n}th`; this is a formatting aid, not RFC 5545 input.
#[must_use]
pub fn ordinal_word(week: i64) -> String {
    match week {
        1 => "first".to_string(),
        2 => "second".to_string(),
        3 => "third".to_string(),
        4 => "fourth".to_string(),
        5 => "fifth".to_string(),
        n => format!("{n}th"),
    }
}

/// ## Summary
/// Translates a recurrence into an RFC 5545 RRULE value string.
///
/// Parts are emitted in a fixed order (FREQ, INTERVAL, BYDAY /
/// BYMONTHDAY, COUNT / UNTIL) and joined with `;`, so equal
/// recurrences always produce byte-identical rules and documents can
/// be regenerated idempotently.
#[must_use]
pub fn to_rrule(recurrence: &Recurrence) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    let freq = match recurrence.frequency {
        Frequency::Daily => "DAILY",
        Frequency::Weekly => "WEEKLY",
        Frequency::Monthly => "MONTHLY",
    };
    parts.push(format!("FREQ={freq}"));

    if recurrence.interval > 1 {
        parts.push(format!("INTERVAL={}", recurrence.interval));
    }

    match recurrence.frequency {
        Frequency::Weekly => {
            let days: Vec<&str> = recurrence
                .weekly_days
                .iter()
                .map(|&code| weekday_code(code))
                .filter(|name| !name.is_empty())
                .collect();
            if !days.is_empty() {
                parts.push(format!("BYDAY={}", days.join(",")));
            }
        }
        Frequency::Monthly => match recurrence.monthly {
            MonthlyPattern::OnDay(day) if day > 0 => {
                parts.push(format!("BYMONTHDAY={day}"));
            }
            MonthlyPattern::OnWeek { week, weekday } if week > 0 => {
                let name = weekday_code(weekday);
                if !name.is_empty() {
                    parts.push(format!("BYDAY={week}{name}"));
                }
            }
            // No qualifier: same day as the anchor, every Nth month.
            _ => {}
        },
        Frequency::Daily => {}
    }

    match recurrence.end {
        EndCondition::Count(n) => parts.push(format!("COUNT={n}")),
        EndCondition::Until(until) => parts.push(format!("UNTIL={}", format_utc(until))),
        EndCondition::Never => {}
    }

    parts.join(";")
}

/// UTC timestamp in the RFC 5545 basic format, Z-suffixed.
#[must_use]
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}
