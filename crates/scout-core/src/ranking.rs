// Candidate rankings by short-term performance and by value for money.
//
// Two data regimes feed the squad builder. In-season data ranks players by a
// blend of form and points-per-game, filtered by availability. Before enough
// of the season has been played, a model's predicted points-per-game is used
// instead. Both implement `CandidateRanker`, so the builder only ever sees
// "a ranking of the pool for a target".

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, Position};
use crate::constraints::RosterConstraintSet;
use crate::error::CoreError;

/// Candidates whose chance of playing is below this are dropped.
pub const DEFAULT_AVAILABILITY_THRESHOLD: f64 = 75.0;
/// Chance of playing assumed when the API publishes none.
pub const DEFAULT_MISSING_AVAILABILITY: f64 = 75.0;
/// Value rankings drop anyone priced at or above this fraction of the
/// most expensive ranked candidate.
pub const DEFAULT_PRICE_CEILING_FRACTION: f64 = 0.75;

/// Per-attempt size of the predicted performance list, per allowed
/// top-performer pick.
const PREDICTED_PERFORMANCE_PER_PICK: usize = 10;
/// Per-attempt size of the predicted value list, per squad slot.
const PREDICTED_VALUE_PER_SLOT: usize = 20;

// ---------------------------------------------------------------------------
// Targets and settings
// ---------------------------------------------------------------------------

/// What a ranking optimises for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankingTarget {
    Performance,
    Value,
}

const TARGET_NAMES: &[&str] = &["performance", "budget", "value"];

impl RankingTarget {
    /// Parse a target name. "budget" and "value" both mean [`RankingTarget::Value`].
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "performance" => Some(RankingTarget::Performance),
            "budget" | "value" => Some(RankingTarget::Value),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::from_name(s).ok_or_else(|| CoreError::InvalidArgument {
            argument: "ranking target".into(),
            value: s.to_string(),
            allowed: TARGET_NAMES.to_vec(),
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankingTarget::Performance => "performance",
            RankingTarget::Value => "value",
        }
    }
}

/// Tunables shared by both rankers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingSettings {
    pub availability_threshold: f64,
    pub missing_availability: f64,
    pub price_ceiling_fraction: f64,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            availability_threshold: DEFAULT_AVAILABILITY_THRESHOLD,
            missing_availability: DEFAULT_MISSING_AVAILABILITY,
            price_ceiling_fraction: DEFAULT_PRICE_CEILING_FRACTION,
        }
    }
}

// ---------------------------------------------------------------------------
// Ranker trait
// ---------------------------------------------------------------------------

/// A source of ranked candidates for the squad builder.
pub trait CandidateRanker {
    /// Rank `pool` for `target`, best first, optionally restricted to one
    /// position and truncated to `limit` entries.
    fn rank<'a>(
        &self,
        pool: &'a [Candidate],
        target: RankingTarget,
        position: Option<Position>,
        limit: Option<usize>,
    ) -> Vec<&'a Candidate>;

    /// How many candidates one selection attempt draws from the `target`
    /// ranking when `bp_limit` top-performer picks are allowed. `None`
    /// means the whole ranking.
    fn source_limit(
        &self,
        _target: RankingTarget,
        _bp_limit: usize,
        _constraints: &RosterConstraintSet,
    ) -> Option<usize> {
        None
    }

    /// [`CandidateRanker::rank`] with the target and position given by name.
    fn rank_named<'a>(
        &self,
        pool: &'a [Candidate],
        target: &str,
        position: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<&'a Candidate>, CoreError> {
        let position = position.map(Position::parse).transpose()?;
        let target = RankingTarget::parse(target)?;
        Ok(self.rank(pool, target, position, limit))
    }
}

// ---------------------------------------------------------------------------
// In-season ranker
// ---------------------------------------------------------------------------

/// Ranks live season data: availability-filtered, blended form/ppg for
/// performance, the API's season value for value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveRanker {
    pub settings: RankingSettings,
}

impl LiveRanker {
    pub fn new(settings: RankingSettings) -> Self {
        Self { settings }
    }
}

impl CandidateRanker for LiveRanker {
    fn rank<'a>(
        &self,
        pool: &'a [Candidate],
        target: RankingTarget,
        position: Option<Position>,
        limit: Option<usize>,
    ) -> Vec<&'a Candidate> {
        let s = &self.settings;
        let mut ranked: Vec<&Candidate> = pool
            .iter()
            .filter(|c| position.map_or(true, |p| c.position == p))
            .filter(|c| c.availability_or(s.missing_availability) >= s.availability_threshold)
            .collect();

        match target {
            RankingTarget::Performance => {
                sort_descending(&mut ranked, |c| {
                    Candidate::blended_performance(c.form, c.points_per_game)
                });
                truncate(&mut ranked, limit);
            }
            RankingTarget::Value => {
                sort_descending(&mut ranked, |c| c.value);
                truncate(&mut ranked, limit);
                // The ceiling comes from the truncated list, not the pool.
                apply_price_ceiling(&mut ranked, s.price_ceiling_fraction);
            }
        }

        ranked
    }
}

// ---------------------------------------------------------------------------
// Predicted ranker
// ---------------------------------------------------------------------------

/// Ranks model-predicted data, where `performance` holds the predicted
/// points-per-game and `value` the predicted points per price unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictedRanker {
    pub settings: RankingSettings,
}

impl PredictedRanker {
    pub fn new(settings: RankingSettings) -> Self {
        Self { settings }
    }
}

impl CandidateRanker for PredictedRanker {
    fn rank<'a>(
        &self,
        pool: &'a [Candidate],
        target: RankingTarget,
        position: Option<Position>,
        limit: Option<usize>,
    ) -> Vec<&'a Candidate> {
        let mut ranked: Vec<&Candidate> = pool.iter().collect();

        match target {
            RankingTarget::Performance => sort_descending(&mut ranked, |c| c.performance),
            RankingTarget::Value => {
                // The ceiling comes from the whole pool here.
                apply_price_ceiling(&mut ranked, self.settings.price_ceiling_fraction);
                sort_descending(&mut ranked, |c| c.value);
            }
        }

        if let Some(p) = position {
            ranked.retain(|c| c.position == p);
        }
        truncate(&mut ranked, limit);
        ranked
    }

    fn source_limit(
        &self,
        target: RankingTarget,
        bp_limit: usize,
        constraints: &RosterConstraintSet,
    ) -> Option<usize> {
        match target {
            RankingTarget::Performance => Some(PREDICTED_PERFORMANCE_PER_PICK * bp_limit),
            RankingTarget::Value => Some(PREDICTED_VALUE_PER_SLOT * constraints.squad_size),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Stable descending sort; equal keys keep pool order.
fn sort_descending<F>(ranked: &mut [&Candidate], key: F)
where
    F: Fn(&Candidate) -> f64,
{
    ranked.sort_by(|a, b| descending(key(*a), key(*b)));
}

/// Total descending order on scores. NaN sorts after every number and
/// `-0.0` ties with `0.0`.
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    fn normalise(x: f64) -> f64 {
        if x.is_nan() {
            f64::NEG_INFINITY
        } else {
            x + 0.0
        }
    }
    normalise(b).total_cmp(&normalise(a))
}

fn truncate(ranked: &mut Vec<&Candidate>, limit: Option<usize>) {
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
}

/// Drop candidates priced at or above `fraction` of the highest price in
/// `ranked`.
fn apply_price_ceiling(ranked: &mut Vec<&Candidate>, fraction: f64) {
    let Some(max_price) = ranked.iter().map(|c| c.price).max() else {
        return;
    };
    let ceiling = fraction * max_price as f64;
    ranked.retain(|c| (c.price as f64) < ceiling);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
