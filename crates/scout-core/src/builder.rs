// Greedy squad search over an increasing top-performer allowance.
//
// Each attempt starts from an empty squad and the full budget, takes up to
// `bp_limit` players from the performance ranking, then fills the remaining
// places from the value ranking. The allowance grows by one per attempt until
// an attempt overspends; the last attempt that stayed within budget wins.

use serde::Serialize;
use tracing::{debug, info};

use crate::candidate::Candidate;
use crate::constraints::RosterConstraintSet;
use crate::error::CoreError;
use crate::ranking::{CandidateRanker, RankingTarget};
use crate::roster::Roster;
use crate::strength::ClubPreferences;

/// Source lists in the order every attempt consumes them.
const SOURCES: [RankingTarget; 2] = [RankingTarget::Performance, RankingTarget::Value];

// ---------------------------------------------------------------------------
// Decision log
// ---------------------------------------------------------------------------

/// Why a candidate was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectionReason {
    AlreadySelected,
    ClubNotPreferred,
    ClubQuota,
    PositionQuota,
}

/// Why a source list was abandoned before its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    RosterFull,
    TopPerformerLimit,
}

/// One decision made while building squads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectionEvent {
    Accepted {
        bp_limit: usize,
        source: RankingTarget,
        candidate_id: u32,
        price: u32,
        remaining_budget: i64,
    },
    Rejected {
        bp_limit: usize,
        source: RankingTarget,
        candidate_id: u32,
        reason: RejectionReason,
    },
    SourceStopped {
        bp_limit: usize,
        source: RankingTarget,
        reason: StopReason,
    },
    /// The attempt went over budget on `candidate_id` and was discarded.
    Overspent {
        bp_limit: usize,
        source: RankingTarget,
        candidate_id: u32,
        remaining_budget: i64,
    },
}

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// An attempt overspent; the one before it was kept.
    BudgetExhausted,
    /// Every allowance up to the squad size fit the budget; the last was kept.
    ThresholdsExhausted,
}

/// The chosen squad plus how it was found.
#[derive(Debug, Clone)]
pub struct RosterSelection<'a> {
    pub roster: Roster<'a>,
    /// Top-performer allowance of the attempt that produced `roster`.
    pub bp_limit: usize,
    pub termination: Termination,
    /// Decisions from every attempt, including discarded ones.
    pub events: Vec<SelectionEvent>,
}

impl<'a> RosterSelection<'a> {
    pub fn members(&self) -> &[&'a Candidate] {
        self.roster.members()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

enum ListOutcome {
    Exhausted,
    Stopped,
    Overspent,
}

/// Builds one squad from a candidate pool.
pub struct RosterBuilder<'r, R: CandidateRanker + ?Sized> {
    ranker: &'r R,
    constraints: RosterConstraintSet,
    preferences: Option<ClubPreferences>,
}

impl<'r, R: CandidateRanker + ?Sized> RosterBuilder<'r, R> {
    pub fn new(ranker: &'r R, constraints: RosterConstraintSet) -> Self {
        Self {
            ranker,
            constraints,
            preferences: None,
        }
    }

    /// Only accept players from clubs on the list for their profile.
    pub fn with_preferences(mut self, preferences: ClubPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Run the search over `pool`.
    ///
    /// Fails with [`CoreError::NoFeasibleRoster`] when the pool is empty or
    /// the kept attempt has no members.
    pub fn build<'a>(&self, pool: &'a [Candidate]) -> Result<RosterSelection<'a>, CoreError> {
        if pool.is_empty() {
            return Err(CoreError::NoFeasibleRoster {
                reason: "candidate pool is empty".into(),
            });
        }

        let mut events = Vec::new();
        let mut previous: Option<(Roster<'a>, usize)> = None;

        for bp_limit in 0..=self.constraints.squad_size {
            let mut roster = Roster::new(self.constraints.budget);

            for source in SOURCES {
                let limit = self.ranker.source_limit(source, bp_limit, &self.constraints);
                let ranked = self.ranker.rank(pool, source, None, limit);

                if let ListOutcome::Overspent =
                    self.fill_from(&mut roster, &ranked, source, bp_limit, &mut events)
                {
                    return finish(previous, Termination::BudgetExhausted, events);
                }
            }

            debug!(
                "attempt bp_limit={} filled {} places, {} budget left",
                bp_limit,
                roster.len(),
                roster.remaining_budget()
            );
            previous = Some((roster, bp_limit));
        }

        finish(previous, Termination::ThresholdsExhausted, events)
    }

    fn fill_from<'a>(
        &self,
        roster: &mut Roster<'a>,
        ranked: &[&'a Candidate],
        source: RankingTarget,
        bp_limit: usize,
        events: &mut Vec<SelectionEvent>,
    ) -> ListOutcome {
        let reject = |events: &mut Vec<SelectionEvent>, id: u32, reason: RejectionReason| {
            events.push(SelectionEvent::Rejected {
                bp_limit,
                source,
                candidate_id: id,
                reason,
            });
        };
        let stop = |events: &mut Vec<SelectionEvent>, reason: StopReason| {
            debug!("bp_limit={} {} list stopped: {:?}", bp_limit, source.label(), reason);
            events.push(SelectionEvent::SourceStopped {
                bp_limit,
                source,
                reason,
            });
        };

        for &candidate in ranked {
            if roster.contains(candidate.id) {
                reject(events, candidate.id, RejectionReason::AlreadySelected);
                continue;
            }
            if roster.len() >= self.constraints.squad_size {
                stop(events, StopReason::RosterFull);
                return ListOutcome::Stopped;
            }
            if let Some(prefs) = &self.preferences {
                if !prefs.allows(candidate.profile(), &candidate.club) {
                    reject(events, candidate.id, RejectionReason::ClubNotPreferred);
                    continue;
                }
            }
            if roster.club_count(&candidate.club) >= self.constraints.per_club {
                reject(events, candidate.id, RejectionReason::ClubQuota);
                continue;
            }
            if roster.position_count(candidate.position)
                >= self.constraints.position_cap(candidate.position)
            {
                reject(events, candidate.id, RejectionReason::PositionQuota);
                continue;
            }
            if source == RankingTarget::Performance {
                if roster.top_performer_picks() >= bp_limit {
                    stop(events, StopReason::TopPerformerLimit);
                    return ListOutcome::Stopped;
                }
                roster.note_top_performer();
            }

            roster.accept(candidate);
            events.push(SelectionEvent::Accepted {
                bp_limit,
                source,
                candidate_id: candidate.id,
                price: candidate.price,
                remaining_budget: roster.remaining_budget(),
            });

            if roster.is_overspent() {
                debug!(
                    "bp_limit={} overspent on {} ({}), remaining {}",
                    bp_limit,
                    candidate.name,
                    candidate.id,
                    roster.remaining_budget()
                );
                events.push(SelectionEvent::Overspent {
                    bp_limit,
                    source,
                    candidate_id: candidate.id,
                    remaining_budget: roster.remaining_budget(),
                });
                return ListOutcome::Overspent;
            }
        }

        ListOutcome::Exhausted
    }
}

fn finish<'a>(
    previous: Option<(Roster<'a>, usize)>,
    termination: Termination,
    events: Vec<SelectionEvent>,
) -> Result<RosterSelection<'a>, CoreError> {
    match previous {
        Some((roster, bp_limit)) if !roster.is_empty() => {
            info!(
                "selected {} players with bp_limit={} ({:?}), {} budget left",
                roster.len(),
                bp_limit,
                termination,
                roster.remaining_budget()
            );
            Ok(RosterSelection {
                roster,
                bp_limit,
                termination,
                events,
            })
        }
        Some(_) => Err(CoreError::NoFeasibleRoster {
            reason: "no candidate satisfies the squad constraints".into(),
        }),
        None => Err(CoreError::NoFeasibleRoster {
            reason: "the first attempt already exceeds the budget".into(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::candidate::Position;
    use crate::ranking::{LiveRanker, PredictedRanker};

    fn player(id: u32, club: &str, position: Position, price: u32, perf: f64, value: f64) -> Candidate {
        Candidate {
            id,
            name: format!("P{id}"),
            position,
            club_id: 0,
            club: club.into(),
            price,
            availability: None,
            form: perf,
            points_per_game: perf,
            performance: perf,
            value,
            total_points: 0,
            starts: 0,
        }
    }

    fn constraints(positions: &[(Position, usize)], per_club: usize, size: usize, budget: u32) -> RosterConstraintSet {
        RosterConstraintSet::new(positions.iter().copied().collect::<HashMap<_, _>>(), per_club, size, budget)
    }

    #[test]
    fn empty_pool_is_infeasible() {
        let ranker = LiveRanker::default();
        let builder = RosterBuilder::new(&ranker, RosterConstraintSet::default());
        let err = builder.build(&[]).unwrap_err();
        assert!(matches!(err, CoreError::NoFeasibleRoster { .. }));
    }

    #[test]
    fn first_attempt_overspend_is_infeasible() {
        // Cheap players first by value, but a single one exceeds the budget.
        let pool = vec![
            player(1, "A", Position::Forward, 10, 1.0, 9.0),
            player(2, "B", Position::Forward, 100, 1.0, 1.0),
        ];
        let ranker = LiveRanker::default();
        let c = constraints(&[(Position::Forward, 3)], 3, 3, 5);
        let err = RosterBuilder::new(&ranker, c).build(&pool).unwrap_err();
        assert!(matches!(err, CoreError::NoFeasibleRoster { .. }));
    }

    #[test]
    fn overspend_returns_previous_attempt() {
        // Value list (after the ceiling) holds only the cheap defender.
        // Attempt 0 buys him (300). Attempt 1 also takes the star forward
        // from the performance list (300 + 900 > 1000) and overspends.
        let pool = vec![
            player(1, "A", Position::Forward, 900, 9.0, 0.1),
            player(2, "B", Position::Defender, 300, 1.0, 5.0),
        ];
        let ranker = LiveRanker::default();
        let c = constraints(&[(Position::Forward, 1), (Position::Defender, 1)], 3, 2, 1000);

        let selection = RosterBuilder::new(&ranker, c).build(&pool).unwrap();
        assert_eq!(selection.bp_limit, 0);
        assert_eq!(selection.termination, Termination::BudgetExhausted);
        assert_eq!(selection.roster.ids(), vec![2]);
        assert!(selection
            .events
            .iter()
            .any(|e| matches!(e, SelectionEvent::Overspent { bp_limit: 1, candidate_id: 2, .. })));
    }

    #[test]
    fn thresholds_exhausted_keeps_last_attempt() {
        let pool = vec![
            player(1, "A", Position::Midfielder, 10, 5.0, 1.0),
            player(2, "B", Position::Midfielder, 10, 4.0, 1.0),
        ];
        let ranker = LiveRanker::default();
        let c = constraints(&[(Position::Midfielder, 2)], 3, 2, 1000);

        let selection = RosterBuilder::new(&ranker, c).build(&pool).unwrap();
        assert_eq!(selection.termination, Termination::ThresholdsExhausted);
        assert_eq!(selection.bp_limit, 2);
        assert_eq!(selection.roster.ids(), vec![1, 2]);
        assert_eq!(selection.roster.top_performer_picks(), 2);
    }

    #[test]
    fn club_and_position_caps_hold() {
        let pool: Vec<Candidate> = (1..=12)
            .map(|i| {
                let club = if i <= 6 { "A" } else { "B" };
                player(i, club, Position::Defender, 10, f64::from(20 - i), 1.0)
            })
            .collect();
        let ranker = LiveRanker::default();
        let c = constraints(&[(Position::Defender, 5)], 2, 5, 1000);

        let selection = RosterBuilder::new(&ranker, c).build(&pool).unwrap();
        let roster = &selection.roster;
        assert_eq!(roster.len(), 4, "two clubs × two per club");
        assert_eq!(roster.club_count("A"), 2);
        assert_eq!(roster.club_count("B"), 2);
        assert!(selection.events.iter().any(|e| matches!(
            e,
            SelectionEvent::Rejected { reason: RejectionReason::ClubQuota, .. }
        )));
    }

    #[test]
    fn preferences_filter_by_profile() {
        let pool = vec![
            player(1, "Attackers", Position::Forward, 10, 5.0, 1.0),
            player(2, "Attackers", Position::Defender, 10, 5.0, 1.0),
            player(3, "Defenders", Position::Defender, 10, 4.0, 1.0),
            player(4, "Defenders", Position::Forward, 10, 4.0, 1.0),
        ];
        let prefs = ClubPreferences {
            defensive: vec!["Defenders".into()],
            offensive: vec!["Attackers".into()],
        };
        let ranker = LiveRanker::default();
        let c = constraints(&[(Position::Forward, 2), (Position::Defender, 2)], 3, 4, 1000);

        let selection = RosterBuilder::new(&ranker, c)
            .with_preferences(prefs)
            .build(&pool)
            .unwrap();
        let mut ids = selection.roster.ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn predicted_ranker_limits_performance_list() {
        // With the predicted ranker and bp_limit 0 the performance list is
        // empty, so no top-performer events are recorded for that attempt.
        let pool = vec![
            player(1, "A", Position::Goalkeeper, 40, 5.0, 1.0),
            player(2, "B", Position::Goalkeeper, 45, 4.0, 2.0),
        ];
        let ranker = PredictedRanker::default();
        let c = constraints(&[(Position::Goalkeeper, 2)], 3, 2, 1000);

        let selection = RosterBuilder::new(&ranker, c).build(&pool).unwrap();
        assert!(!selection.events.iter().any(|e| matches!(
            e,
            SelectionEvent::SourceStopped { bp_limit: 0, source: RankingTarget::Performance, .. }
        )));
        assert!(!selection.roster.is_empty());
    }

    #[test]
    fn events_serialize() {
        let event = SelectionEvent::Rejected {
            bp_limit: 2,
            source: RankingTarget::Value,
            candidate_id: 7,
            reason: RejectionReason::ClubQuota,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Rejected"));
        assert!(json.contains("ClubQuota"));
        assert!(json.contains("\"Value\""));
    }

    #[test]
    fn builder_works_through_trait_object() {
        let pool = vec![player(1, "A", Position::Forward, 10, 5.0, 1.0)];
        let ranker: Box<dyn CandidateRanker> = Box::new(LiveRanker::default());
        let c = constraints(&[(Position::Forward, 1)], 1, 1, 100);
        let selection = RosterBuilder::new(ranker.as_ref(), c).build(&pool).unwrap();
        assert_eq!(selection.roster.ids(), vec![1]);
    }
}
