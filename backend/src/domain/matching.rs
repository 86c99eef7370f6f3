//! Ranking of candidate members for a slot.
//!
//! Matching is advisory: it orders members who declared availability for the
//! slot and never falls back to members without availability data.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::{
    AvailabilityVerdict, Member, MemberAvailability, MemberId, ScheduleException, Slot,
    resolve_availability,
};

/// A ranked, reasoned suggestion of one member for a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Ranked member.
    pub member_id: MemberId,
    /// Display name at ranking time.
    pub member_name: String,
    /// Coverage score from 0 to 100.
    pub score: u8,
    /// Human-readable notes behind the score.
    pub reasons: Vec<String>,
}

/// Rank `members` for `slot`.
///
/// Members in `already_assigned` are skipped. `rules` and `exceptions` may
/// cover many members; each member is resolved against its own entries.
/// The result is ordered by score descending, then name, then id.
pub fn rank_candidates(
    slot: &Slot,
    members: &[Member],
    already_assigned: &HashSet<MemberId>,
    rules: &[MemberAvailability],
    exceptions: &[ScheduleException],
) -> Vec<Candidate> {
    let mut rules_by_member: HashMap<MemberId, Vec<MemberAvailability>> = HashMap::new();
    for rule in rules {
        rules_by_member
            .entry(rule.member_id())
            .or_default()
            .push(rule.clone());
    }
    let mut exceptions_by_member: HashMap<MemberId, Vec<ScheduleException>> = HashMap::new();
    for exception in exceptions {
        exceptions_by_member
            .entry(exception.member_id())
            .or_default()
            .push(exception.clone());
    }

    let window = slot.window();
    let mut candidates: Vec<Candidate> = members
        .iter()
        .filter(|member| !already_assigned.contains(&member.id()))
        .filter_map(|member| {
            let own_rules = rules_by_member
                .get(&member.id())
                .map_or(&[][..], Vec::as_slice);
            let own_exceptions = exceptions_by_member
                .get(&member.id())
                .map_or(&[][..], Vec::as_slice);
            match resolve_availability(slot.date(), &window, own_rules, own_exceptions) {
                AvailabilityVerdict::Available { score, reasons } => Some(Candidate {
                    member_id: member.id(),
                    member_name: member.full_name().to_owned(),
                    score,
                    reasons,
                }),
                AvailabilityVerdict::Excluded { .. } | AvailabilityVerdict::Undeclared => None,
            }
        })
        .collect();

    candidates.sort_by(|left, right| {
        right
            .score
            .cmp(&left.score)
            .then_with(|| left.member_name.cmp(&right.member_name))
            .then_with(|| left.member_id.cmp(&right.member_id))
    });
    candidates
}
