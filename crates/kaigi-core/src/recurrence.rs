//! Meeting recurrence model.
//!
//! The persisted shape uses small integer codes (frequency 1-3, weekday
//! 1=Sunday..7=Saturday) for compatibility with existing records, but
//! the in-memory model keeps the mutually exclusive sub-patterns as
//! discriminated types so invalid combinations are unrepresentable:
//! a monthly rule is *either* day-of-month *or* nth-weekday, and at
//! most one end condition can be set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Repeat frequency.
///
/// Wire codes: 1 = daily, 2 = weekly, 3 = monthly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Returns the persisted integer code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 2,
            Self::Monthly => 3,
        }
    }

    /// Parses a persisted integer code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Daily),
            2 => Some(Self::Weekly),
            3 => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl From<Frequency> for u8 {
    fn from(f: Frequency) -> Self {
        f.code()
    }
}

impl TryFrom<u8> for Frequency {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
            .ok_or_else(|| CoreError::ValidationError(format!("unknown frequency code {code}")))
    }
}

/// Which days a monthly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyPattern {
    /// Same day-of-month as the anchor start.
    SameDay,
    /// A fixed day-of-month (1-31). Months lacking the day are skipped.
    OnDay(u8),
    /// The nth weekday of the month, e.g. week 2 + weekday 3 = second Tuesday.
    OnWeek { week: u8, weekday: u8 },
}

/// When a recurring series stops producing occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCondition {
    /// Unbounded series.
    Never,
    /// Stops after this many occurrences, the anchor included.
    Count(u32),
    /// Inclusive upper bound on occurrence start instants.
    Until(DateTime<Utc>),
}

/// A meeting's repeat pattern, immutable once attached to a meeting version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    /// Every N units of the frequency's period. Always >= 1.
    pub interval: u32,
    /// Weekday codes (1=Sunday..7=Saturday) a weekly rule lands on, in
    /// caller order. Empty means "same weekday as the anchor". Ignored
    /// for daily and monthly rules. Out-of-range codes are tolerated
    /// and silently dropped by consumers.
    #[serde(default)]
    pub weekly_days: Vec<u8>,
    /// Monthly sub-pattern. Ignored unless frequency is monthly.
    #[serde(default = "MonthlyPattern::same_day")]
    pub monthly: MonthlyPattern,
    #[serde(default = "EndCondition::never")]
    pub end: EndCondition,
}

impl MonthlyPattern {
    const fn same_day() -> Self {
        Self::SameDay
    }
}

impl EndCondition {
    const fn never() -> Self {
        Self::Never
    }
}

impl Recurrence {
    /// Creates a validated recurrence.
    ///
    /// ## Errors
    /// Returns a validation error for an interval below 1, a zero end
    /// count, a day-of-month outside 1-31, or an nth-weekday pattern
    /// outside week 1-5 / weekday 1-7.
    pub fn new(
        frequency: Frequency,
        interval: u32,
        weekly_days: Vec<u8>,
        monthly: MonthlyPattern,
        end: EndCondition,
    ) -> CoreResult<Self> {
        let recurrence = Self {
            frequency,
            interval,
            weekly_days,
            monthly,
            end,
        };
        recurrence.validate()?;
        Ok(recurrence)
    }

    /// Convenience constructor for a simple "every N periods" rule.
    ///
    /// ## Errors
    /// Returns a validation error if `interval` is below 1.
    pub fn every(frequency: Frequency, interval: u32) -> CoreResult<Self> {
        Self::new(
            frequency,
            interval,
            Vec::new(),
            MonthlyPattern::SameDay,
            EndCondition::Never,
        )
    }

    /// Checks the invariants the rest of the system assumes.
    ///
    /// Weekday codes in `weekly_days` are deliberately not range-checked:
    /// unmappable codes degrade to "no repeat on that day" downstream
    /// instead of blocking invitation delivery.
    ///
    /// ## Errors
    /// Returns a validation error describing the first violated invariant.
    pub fn validate(&self) -> CoreResult<()> {
        if self.interval < 1 {
            return Err(CoreError::ValidationError(format!(
                "repeat interval must be at least 1, got {}",
                self.interval
            )));
        }

        if let EndCondition::Count(0) = self.end {
            return Err(CoreError::InvariantViolation(
                "end count must be positive when set",
            ));
        }

        if self.frequency == Frequency::Monthly {
            match self.monthly {
                MonthlyPattern::OnDay(day) if !(1..=31).contains(&day) => {
                    return Err(CoreError::ValidationError(format!(
                        "day-of-month must be 1-31, got {day}"
                    )));
                }
                MonthlyPattern::OnWeek { week, weekday }
                    if !(1..=5).contains(&week) || !(1..=7).contains(&weekday) =>
                {
                    return Err(CoreError::ValidationError(format!(
                        "nth-weekday pattern out of range: week {week}, weekday {weekday}"
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Returns whether the series is bounded by a count or end instant.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        !matches!(self.end, EndCondition::Never)
    }
}
