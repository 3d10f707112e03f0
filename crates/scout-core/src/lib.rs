// Squad selection for the fantasy football game: fixture strength, candidate
// rankings and the greedy roster search. Pure and synchronous; all I/O lives
// in scout-data and the application crate.

pub mod builder;
pub mod candidate;
pub mod constraints;
pub mod error;
pub mod ranking;
pub mod roster;
pub mod strength;

pub use builder::{RosterBuilder, RosterSelection, SelectionEvent, Termination};
pub use candidate::{Candidate, Position, Profile};
pub use constraints::RosterConstraintSet;
pub use error::CoreError;
pub use ranking::{CandidateRanker, LiveRanker, PredictedRanker, RankingSettings, RankingTarget};
pub use roster::{Roster, UsageCounter};
pub use strength::{compute_strength_indices, ClubPreferences, ClubStrength, ClubStrengthIndex, Fixture};
