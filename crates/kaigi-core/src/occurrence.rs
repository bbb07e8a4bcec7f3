//! Occurrence expansion for recurring meetings.
//!
//! Occurrences are never persisted as a growing log; they are
//! regenerated from the meeting's recurrence whenever a window is
//! requested. All arithmetic happens on the stored absolute instants
//! (UTC); wall-clock localization is a rendering concern.
//!
//! Month-boundary policy: months lacking the target day are skipped,
//! not clamped. A rule on day 31 produces Jan 31, Mar 31, May 31, ...
//! and a fifth-weekday rule skips months with only four such weekdays.
//! This matches what an RFC 5545 client expanding our emitted rule
//! would compute for invalid BYMONTHDAY instances.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::meeting::Meeting;
use crate::recurrence::{EndCondition, Frequency, MonthlyPattern, Recurrence};

/// A single expanded instance of a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub start_time: DateTime<Utc>,
    /// Per-instance overrides, set by out-of-band edits.
    #[serde(default)]
    pub topic_override: Option<String>,
    #[serde(default)]
    pub description_override: Option<String>,
    #[serde(default)]
    pub duration_minutes_override: Option<u32>,
    /// Marked by out-of-band cancellation; excluded from future
    /// documents via EXDATE.
    #[serde(default)]
    pub cancelled: bool,
}

impl Occurrence {
    /// Creates a plain occurrence at the given start with no overrides.
    #[must_use]
    pub const fn at(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            topic_override: None,
            description_override: None,
            duration_minutes_override: None,
            cancelled: false,
        }
    }

    /// Effective duration in minutes, falling back to the meeting default.
    #[must_use]
    pub fn duration_minutes(&self, meeting: &Meeting) -> u32 {
        self.duration_minutes_override
            .unwrap_or(meeting.duration_minutes)
    }
}

/// ## Summary
/// Expands a meeting into up to `limit` occurrences starting at the
/// meeting's own start time.
///
/// A non-recurring meeting yields exactly one occurrence (its own
/// start) regardless of `limit` above 1. For recurring meetings the
/// anchor start is occurrence #1. Expansion halts at the first of:
/// `limit` reached, end count exhausted, or a candidate start past the
/// end instant.
#[must_use]
pub fn calculate_occurrences(meeting: &Meeting, limit: usize) -> Vec<Occurrence> {
    let occurrences: Vec<Occurrence> = series_starts(meeting)
        .take(limit)
        .map(Occurrence::at)
        .collect();
    tracing::trace!(
        meeting = %meeting.id,
        limit,
        count = occurrences.len(),
        "Expanded occurrences"
    );
    occurrences
}

/// ## Summary
/// Expands a meeting into up to `limit` occurrences, starting at the
/// first occurrence at or after `from`.
///
/// The pattern stays anchored at the meeting start; only the emission
/// window slides forward. Week and month alignment are therefore
/// preserved across the cut point.
#[must_use]
pub fn calculate_occurrences_from_date(
    meeting: &Meeting,
    from: DateTime<Utc>,
    limit: usize,
) -> Vec<Occurrence> {
    let occurrences: Vec<Occurrence> = series_starts(meeting)
        .filter(|start| *start >= from)
        .take(limit)
        .map(Occurrence::at)
        .collect();
    tracing::trace!(
        meeting = %meeting.id,
        %from,
        limit,
        count = occurrences.len(),
        "Expanded occurrences from date"
    );
    occurrences
}

/// ## Summary
/// Returns the instant the last occurrence's scheduled window ends,
/// or `None` for an unbounded series.
///
/// A non-recurring meeting ends at `start + duration`. A bounded
/// series whose end instant precedes its anchor has no occurrences and
/// yields `None`.
#[must_use]
pub fn series_end_date(meeting: &Meeting) -> Option<DateTime<Utc>> {
    match &meeting.recurrence {
        None => Some(meeting.first_end_time()),
        Some(recurrence) if !recurrence.is_bounded() => None,
        Some(_) => series_starts(meeting)
            .last()
            .map(|start| start + meeting.duration()),
    }
}

/// Ordered start instants of the whole series, end condition applied.
///
/// The anchor start is always the first item. An internally
/// inconsistent recurrence (unmappable weekday or monthly fields) is
/// not an error: it degrades to the anchor alone so document
/// generation keeps working.
fn series_starts(meeting: &Meeting) -> Box<dyn Iterator<Item = DateTime<Utc>>> {
    let anchor = meeting.start_time;
    let Some(recurrence) = meeting.recurrence.clone() else {
        return Box::new(std::iter::once(anchor));
    };

    let candidates: Box<dyn Iterator<Item = DateTime<Utc>>> = match recurrence.frequency {
        Frequency::Daily => daily_starts(anchor, recurrence.interval),
        Frequency::Weekly => weekly_starts(anchor, &recurrence),
        Frequency::Monthly => monthly_starts(anchor, &recurrence),
    };

    match recurrence.end {
        EndCondition::Never => candidates,
        EndCondition::Count(n) => Box::new(candidates.take(n as usize)),
        EndCondition::Until(until) => Box::new(candidates.take_while(move |s| *s <= until)),
    }
}

fn daily_starts(anchor: DateTime<Utc>, interval: u32) -> Box<dyn Iterator<Item = DateTime<Utc>>> {
    let step = u64::from(interval);
    Box::new((0u64..).filter_map(move |k| anchor.checked_add_days(Days::new(step * k))))
}

fn weekly_starts(
    anchor: DateTime<Utc>,
    recurrence: &Recurrence,
) -> Box<dyn Iterator<Item = DateTime<Utc>>> {
    let interval = i64::from(recurrence.interval);

    // Unmappable codes are dropped up front; an empty result set means
    // "same weekday as the anchor".
    let days: Vec<u8> = recurrence
        .weekly_days
        .iter()
        .copied()
        .filter(|code| (1..=7).contains(code))
        .collect();
    if days.is_empty() {
        if recurrence.weekly_days.is_empty() {
            // Same weekday as the anchor, every N weeks.
            let step = u64::from(recurrence.interval) * 7;
            return Box::new(
                (0u64..).filter_map(move |k| anchor.checked_add_days(Days::new(step * k))),
            );
        }
        // Only unmappable codes were supplied: no repeats beyond the anchor.
        return Box::new(std::iter::once(anchor));
    }

    // Day-by-day scan from the anchor. Weeks are Sunday-based to match
    // the 1=Sunday..7=Saturday weekday codes; a day matches when its
    // week offset from the anchor's week is a multiple of the interval.
    let anchor_date = anchor.date_naive();
    let anchor_time = anchor.time();
    let week_start =
        anchor_date - Days::new(u64::from(anchor_date.weekday().num_days_from_sunday()));

    let scan = (0u64..).filter_map(move |offset| {
        let date = anchor_date.checked_add_days(Days::new(offset))?;
        if offset == 0 {
            return Some(anchor);
        }
        let code = weekday_code_of(date);
        if !days.contains(&code) {
            return None;
        }
        let week_index = (date - week_start).num_days() / 7;
        if week_index % interval != 0 {
            return None;
        }
        let start = Utc.from_utc_datetime(&NaiveDateTime::new(date, anchor_time));
        (start > anchor).then_some(start)
    });
    Box::new(scan)
}

fn monthly_starts(
    anchor: DateTime<Utc>,
    recurrence: &Recurrence,
) -> Box<dyn Iterator<Item = DateTime<Utc>>> {
    let target = match recurrence.monthly {
        MonthlyPattern::SameDay => MonthlyTarget::Day(u8::try_from(anchor.day()).unwrap_or(31)),
        MonthlyPattern::OnDay(day) if (1..=31).contains(&day) => MonthlyTarget::Day(day),
        MonthlyPattern::OnWeek { week, weekday }
            if (1..=5).contains(&week) && (1..=7).contains(&weekday) =>
        {
            MonthlyTarget::NthWeekday { week, weekday }
        }
        // Unmappable monthly fields: no repeats beyond the anchor.
        _ => return Box::new(std::iter::once(anchor)),
    };

    let interval = recurrence.interval;
    let anchor_time = anchor.time();
    let (anchor_year, anchor_month) = (anchor.year(), anchor.month());

    let candidates = (0u32..).filter_map(move |k| {
        let (year, month) = add_months(anchor_year, anchor_month, k.checked_mul(interval)?);
        let date = match target {
            MonthlyTarget::Day(day) => NaiveDate::from_ymd_opt(year, month, u32::from(day))?,
            MonthlyTarget::NthWeekday { week, weekday } => {
                nth_weekday_of_month(year, month, week, weekday)?
            }
        };
        let start = Utc.from_utc_datetime(&NaiveDateTime::new(date, anchor_time));
        (start > anchor).then_some(start)
    });
    Box::new(std::iter::once(anchor).chain(candidates))
}

#[derive(Clone, Copy)]
enum MonthlyTarget {
    Day(u8),
    NthWeekday { week: u8, weekday: u8 },
}

/// Weekday code of a date: 1=Sunday .. 7=Saturday.
fn weekday_code_of(date: NaiveDate) -> u8 {
    u8::try_from(date.weekday().num_days_from_sunday() + 1).unwrap_or(0)
}

/// Calendar-month addition on a (year, month) pair.
fn add_months(year: i32, month: u32, delta: u32) -> (i32, u32) {
    let zero_based = (month - 1) + delta;
    (
        year + i32::try_from(zero_based / 12).unwrap_or(i32::MAX),
        zero_based % 12 + 1,
    )
}

/// Resolves "the Nth weekday of a month", e.g. week 2 + weekday 3 =
/// second Tuesday. Returns `None` when the month has no Nth such
/// weekday (only possible for week 5).
fn nth_weekday_of_month(year: i32, month: u32, week: u8, weekday: u8) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_code = u32::from(weekday_code_of(first));
    let offset = (7 + u32::from(weekday) - first_code) % 7;
    let day = 1 + offset + 7 * (u32::from(week) - 1);
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeetingId;
    use chrono::TimeZone;

    fn meeting_at(start: DateTime<Utc>, recurrence: Option<Recurrence>) -> Meeting {
        Meeting {
            id: MeetingId::new("uid-occ"),
            topic: "Planning".to_string(),
            description: String::new(),
            project_name: String::new(),
            start_time: start,
            duration_minutes: 60,
            timezone: "UTC".to_string(),
            join_link: String::new(),
            dial_in_id: String::new(),
            passcode: String::new(),
            fallback_link: String::new(),
            attachments: Vec::new(),
            recurrence,
            sequence: 0,
            cancelled_occurrences: Vec::new(),
        }
    }

    fn recurrence(
        frequency: Frequency,
        interval: u32,
        weekly_days: Vec<u8>,
        monthly: MonthlyPattern,
        end: EndCondition,
    ) -> Recurrence {
        Recurrence::new(frequency, interval, weekly_days, monthly, end)
            .expect("valid test recurrence")
    }

    fn starts(occurrences: &[Occurrence]) -> Vec<DateTime<Utc>> {
        occurrences.iter().map(|o| o.start_time).collect()
    }

    #[test]
    fn non_recurring_yields_single_occurrence() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(start, None);

        let occurrences = calculate_occurrences(&meeting, 5);
        assert_eq!(starts(&occurrences), vec![start]);
    }

    #[test]
    fn bounded_series_ignores_larger_limit() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Daily,
                1,
                Vec::new(),
                MonthlyPattern::SameDay,
                EndCondition::Count(3),
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 10);
        assert_eq!(
            starts(&occurrences),
            vec![
                start,
                Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn daily_interval_steps_days() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Daily,
                3,
                Vec::new(),
                MonthlyPattern::SameDay,
                EndCondition::Never,
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 3);
        assert_eq!(
            starts(&occurrences),
            vec![
                start,
                Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 8, 9, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn weekly_without_days_repeats_anchor_weekday() {
        // 2026-03-02 is a Monday.
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Weekly,
                2,
                Vec::new(),
                MonthlyPattern::SameDay,
                EndCondition::Never,
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 3);
        assert_eq!(
            starts(&occurrences),
            vec![
                start,
                Utc.with_ymd_and_hms(2026, 3, 16, 14, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 30, 14, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn weekly_with_days_emits_each_matched_weekday() {
        // Anchor Monday 2026-03-02; rule lands on Monday (2) and Friday (6).
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Weekly,
                1,
                vec![2, 6],
                MonthlyPattern::SameDay,
                EndCondition::Never,
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 4);
        assert_eq!(
            starts(&occurrences),
            vec![
                start,
                Utc.with_ymd_and_hms(2026, 3, 6, 10, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 13, 10, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn weekly_interval_aligns_to_anchor_week() {
        // Anchor Wednesday 2026-03-04, every 2 weeks on Mon/Wed.
        let start = Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Weekly,
                2,
                vec![2, 4],
                MonthlyPattern::SameDay,
                EndCondition::Never,
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 3);
        // Next matches skip the off week: Mon 2026-03-16, Wed 2026-03-18.
        assert_eq!(
            starts(&occurrences),
            vec![
                start,
                Utc.with_ymd_and_hms(2026, 3, 16, 10, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 18, 10, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn weekly_with_only_unmappable_days_degrades_to_anchor() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Weekly,
                1,
                vec![0, 9],
                MonthlyPattern::SameDay,
                EndCondition::Never,
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 5);
        assert_eq!(starts(&occurrences), vec![start]);
    }

    #[test]
    fn monthly_day_31_skips_short_months() {
        let start = Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Monthly,
                1,
                Vec::new(),
                MonthlyPattern::OnDay(31),
                EndCondition::Never,
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 3);
        // February and April are skipped, never clamped.
        assert_eq!(
            starts(&occurrences),
            vec![
                start,
                Utc.with_ymd_and_hms(2026, 3, 31, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 5, 31, 9, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn monthly_second_tuesday() {
        // 2026-03-10 is the second Tuesday of March.
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 16, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Monthly,
                1,
                Vec::new(),
                MonthlyPattern::OnWeek {
                    week: 2,
                    weekday: 3,
                },
                EndCondition::Never,
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 3);
        assert_eq!(
            starts(&occurrences),
            vec![
                start,
                Utc.with_ymd_and_hms(2026, 4, 14, 16, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 5, 12, 16, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn monthly_fifth_weekday_skips_short_months() {
        // Fifth Friday of May 2026 is the 29th; June has only four Fridays.
        let start = Utc.with_ymd_and_hms(2026, 5, 29, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Monthly,
                1,
                Vec::new(),
                MonthlyPattern::OnWeek {
                    week: 5,
                    weekday: 6,
                },
                EndCondition::Never,
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 2);
        assert_eq!(
            starts(&occurrences),
            vec![start, Utc.with_ymd_and_hms(2026, 7, 31, 9, 0, 0).unwrap()],
        );
    }

    #[test]
    fn until_is_an_inclusive_bound() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Daily,
                1,
                Vec::new(),
                MonthlyPattern::SameDay,
                EndCondition::Until(until),
            )),
        );

        let occurrences = calculate_occurrences(&meeting, 10);
        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences.last().map(|o| o.start_time), Some(until));
    }

    #[test]
    fn from_date_slides_window_without_re_anchoring() {
        // Every 2 days from 2026-03-02; window opens mid-pattern.
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Daily,
                2,
                Vec::new(),
                MonthlyPattern::SameDay,
                EndCondition::Never,
            )),
        );

        let from = Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap();
        let occurrences = calculate_occurrences_from_date(&meeting, from, 2);
        // 2026-03-05 is an off day; alignment stays on the even offsets.
        assert_eq!(
            starts(&occurrences),
            vec![
                Utc.with_ymd_and_hms(2026, 3, 6, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 8, 9, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn from_date_includes_exact_match() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Daily,
                1,
                Vec::new(),
                MonthlyPattern::SameDay,
                EndCondition::Count(5),
            )),
        );

        let from = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        let occurrences = calculate_occurrences_from_date(&meeting, from, 10);
        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences[0].start_time, from);
    }

    #[test]
    fn series_end_date_for_counted_series() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Daily,
                1,
                Vec::new(),
                MonthlyPattern::SameDay,
                EndCondition::Count(3),
            )),
        );

        // Last occurrence starts 2026-03-04 09:00 and runs 60 minutes.
        assert_eq!(
            series_end_date(&meeting),
            Some(Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn series_end_date_for_unbounded_series_is_none() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(
            start,
            Some(recurrence(
                Frequency::Weekly,
                1,
                vec![2],
                MonthlyPattern::SameDay,
                EndCondition::Never,
            )),
        );

        assert_eq!(series_end_date(&meeting), None);
    }

    #[test]
    fn series_end_date_for_single_meeting() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(start, None);

        assert_eq!(series_end_date(&meeting), Some(meeting.first_end_time()));
    }

    #[test]
    fn occurrence_duration_falls_back_to_meeting() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let meeting = meeting_at(start, None);

        let mut occurrence = Occurrence::at(start);
        assert_eq!(occurrence.duration_minutes(&meeting), 60);
        occurrence.duration_minutes_override = Some(15);
        assert_eq!(occurrence.duration_minutes(&meeting), 15);
    }
}
