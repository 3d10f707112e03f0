// Squad rules: positional quotas, club quota, squad size and budget.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::candidate::Position;

/// Starting allowance for every selection attempt, in price units.
pub const DEFAULT_BUDGET: u32 = 1000;
/// Maximum number of players in a squad.
pub const DEFAULT_SQUAD_SIZE: usize = 15;
/// Maximum number of players from a single club.
pub const DEFAULT_MAX_PER_CLUB: usize = 3;

/// Immutable squad rules for one selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterConstraintSet {
    /// Maximum players per position. A position missing from the table
    /// cannot be picked at all.
    pub per_position: HashMap<Position, usize>,
    pub per_club: usize,
    pub squad_size: usize,
    pub budget: u32,
}

impl RosterConstraintSet {
    pub fn new(
        per_position: HashMap<Position, usize>,
        per_club: usize,
        squad_size: usize,
        budget: u32,
    ) -> Self {
        Self {
            per_position,
            per_club,
            squad_size,
            budget,
        }
    }

    /// Cap for `position`, zero when the table has no entry for it.
    pub fn position_cap(&self, position: Position) -> usize {
        self.per_position.get(&position).copied().unwrap_or(0)
    }
}

impl Default for RosterConstraintSet {
    /// The standard game rules: 2 GK, 5 DEF, 5 MID, 3 FWD, 3 per club,
    /// 15 players and a 100.0m (1000 unit) budget.
    fn default() -> Self {
        let per_position = HashMap::from([
            (Position::Goalkeeper, 2),
            (Position::Defender, 5),
            (Position::Midfielder, 5),
            (Position::Forward, 3),
        ]);
        Self::new(
            per_position,
            DEFAULT_MAX_PER_CLUB,
            DEFAULT_SQUAD_SIZE,
            DEFAULT_BUDGET,
        )
    }
}
