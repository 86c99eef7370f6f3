//! Resolution of one member's availability for one slot.

use chrono::NaiveDate;

use crate::domain::TimeWindow;

use super::{ExceptionKind, MemberAvailability, ScheduleException};

/// Outcome of checking a member against a slot's date and window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityVerdict {
    /// The member declared availability; `score` is 1..=100.
    Available { score: u8, reasons: Vec<String> },
    /// An exception or explicit unavailability rule rules the member out.
    Excluded { reason: String },
    /// Nothing the member declared touches the slot.
    Undeclared,
}

/// Score how much of `slot` the union of `windows` covers.
///
/// Full coverage scores 100. Partial coverage scores the covered
/// percentage, floored and clamped to 1..=99. No overlap scores 0.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use scheduling::domain::{TimeWindow, coverage_score};
///
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).expect("valid time");
/// let slot = TimeWindow::new(t(8), t(12)).expect("valid window");
/// let morning = TimeWindow::new(t(7), t(10)).expect("valid window");
/// assert_eq!(coverage_score(&slot, [morning]), 50);
/// ```
pub fn coverage_score(slot: &TimeWindow, windows: impl IntoIterator<Item = TimeWindow>) -> u8 {
    let mut pieces: Vec<TimeWindow> = windows
        .into_iter()
        .filter_map(|window| window.intersection(slot))
        .collect();
    if pieces.is_empty() {
        return 0;
    }
    pieces.sort_by_key(TimeWindow::start);

    let mut covered = 0_i64;
    let mut current = pieces[0];
    for piece in pieces.into_iter().skip(1) {
        if piece.start() <= current.end() {
            if piece.end() > current.end() {
                current = TimeWindow::new(current.start(), piece.end()).unwrap_or(current);
            }
        } else {
            covered += current.duration_minutes();
            current = piece;
        }
    }
    covered += current.duration_minutes();

    let total = slot.duration_minutes();
    if covered >= total {
        return 100;
    }
    let percent = covered * 100 / total;
    u8::try_from(percent.clamp(1, 99)).unwrap_or(1)
}

/// Decide whether a member can take a slot on `date` during `slot`.
///
/// `rules` and `exceptions` must belong to the same member. Exceptions that
/// touch the slot take precedence: an unavailable one excludes, otherwise an
/// available one includes regardless of weekly rules. Without a touching
/// exception, weekly rules valid on `date` whose window overlaps the slot
/// decide; one explicit unavailability rule excludes.
pub fn resolve_availability(
    date: NaiveDate,
    slot: &TimeWindow,
    rules: &[MemberAvailability],
    exceptions: &[ScheduleException],
) -> AvailabilityVerdict {
    let touching: Vec<&ScheduleException> = exceptions
        .iter()
        .filter(|exception| exception.affects(date, slot))
        .collect();

    if let Some(blocking) = touching
        .iter()
        .find(|exception| exception.kind() == ExceptionKind::Unavailable)
    {
        return AvailabilityVerdict::Excluded {
            reason: blocking.describe(),
        };
    }
    if !touching.is_empty() {
        let whole_day = touching.iter().any(|exception| exception.window().is_none());
        let score = if whole_day {
            100
        } else {
            coverage_score(slot, touching.iter().filter_map(|exception| exception.window()))
        };
        return AvailabilityVerdict::Available {
            score,
            reasons: touching.iter().map(|exception| exception.describe()).collect(),
        };
    }

    let applicable: Vec<&MemberAvailability> = rules
        .iter()
        .filter(|rule| rule.applies_on(date) && rule.window().overlaps(slot))
        .collect();

    if let Some(blocking) = applicable.iter().find(|rule| !rule.is_available()) {
        return AvailabilityVerdict::Excluded {
            reason: blocking.describe(),
        };
    }
    if applicable.is_empty() {
        return AvailabilityVerdict::Undeclared;
    }

    AvailabilityVerdict::Available {
        score: coverage_score(slot, applicable.iter().map(|rule| rule.window())),
        reasons: applicable.iter().map(|rule| rule.describe()).collect(),
    }
}
