// Typed, joined view of one API download.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use scout_core::{Candidate, ClubStrength, Fixture, Position};

use crate::api::{BootstrapStatic, RawFixture};
use crate::error::DataError;

/// Candidates, clubs and fixtures of the current season.
///
/// Candidates come out scored for the live regime: `performance` is the
/// form/points-per-game blend and `value` the API's season value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSnapshot {
    pub candidates: Vec<Candidate>,
    pub clubs: Vec<ClubStrength>,
    pub fixtures: Vec<Fixture>,
}

impl SeasonSnapshot {
    /// Join players to their positions and clubs.
    ///
    /// Players whose element type is not a squad position (the API also
    /// lists managers) or whose club is unknown are skipped.
    pub fn from_raw(bootstrap: &BootstrapStatic, fixtures: &[RawFixture]) -> Result<Self, DataError> {
        if bootstrap.elements.is_empty() {
            return Err(DataError::Unavailable("bootstrap data has no players".into()));
        }
        if bootstrap.teams.is_empty() {
            return Err(DataError::Unavailable("bootstrap data has no clubs".into()));
        }

        let positions: HashMap<u8, Position> = bootstrap
            .element_types
            .iter()
            .filter_map(|t| Position::from_str_pos(&t.singular_name).map(|p| (t.id, p)))
            .collect();
        let clubs: Vec<ClubStrength> = bootstrap.teams.iter().map(ClubStrength::from).collect();
        let club_names: HashMap<u32, &str> = clubs.iter().map(|c| (c.id, c.name.as_str())).collect();

        let mut candidates = Vec::with_capacity(bootstrap.elements.len());
        let mut skipped = 0usize;
        for e in &bootstrap.elements {
            let Some(&position) = positions.get(&e.element_type) else {
                skipped += 1;
                continue;
            };
            let Some(&club) = club_names.get(&e.team) else {
                warn!("skipping player {} ({}): unknown club id {}", e.id, e.web_name, e.team);
                skipped += 1;
                continue;
            };

            candidates.push(Candidate {
                id: e.id,
                name: e.full_name(),
                position,
                club_id: e.team,
                club: club.to_string(),
                price: e.now_cost,
                availability: e.chance_of_playing_this_round,
                form: e.form,
                points_per_game: e.points_per_game,
                performance: Candidate::blended_performance(e.form, e.points_per_game),
                value: e.value_season,
                total_points: e.total_points,
                starts: e.starts,
            });
        }

        if skipped > 0 {
            warn!("skipped {} entries without a squad position or club", skipped);
        }
        info!(
            "snapshot: {} candidates, {} clubs, {} fixtures",
            candidates.len(),
            clubs.len(),
            fixtures.len()
        );

        Ok(Self {
            candidates,
            clubs,
            fixtures: fixtures.iter().map(Fixture::from).collect(),
        })
    }
}
