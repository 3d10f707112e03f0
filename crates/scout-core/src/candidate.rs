// Candidate players, positions and positional profiles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Squad positions recognised by the fantasy game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

/// All positions in squad display order.
pub const ALL_POSITIONS: [Position; 4] = [
    Position::Goalkeeper,
    Position::Defender,
    Position::Midfielder,
    Position::Forward,
];

impl Position {
    /// Parse a position name into a Position.
    ///
    /// Accepts the API's singular names ("Goalkeeper"), the short codes used
    /// on the game's site ("GKP", "DEF", "MID", "FWD") and a few common
    /// aliases ("GK", "FW"). Matching is case-insensitive.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GOALKEEPER" | "GKP" | "GK" => Some(Position::Goalkeeper),
            "DEFENDER" | "DEF" => Some(Position::Defender),
            "MIDFIELDER" | "MID" => Some(Position::Midfielder),
            "FORWARD" | "FWD" | "FW" => Some(Position::Forward),
            _ => None,
        }
    }

    /// Like [`Position::from_str_pos`], but reports unknown names as
    /// [`CoreError::InvalidArgument`].
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::from_str_pos(s).ok_or_else(|| CoreError::InvalidArgument {
            argument: "position".into(),
            value: s.to_string(),
            allowed: ALL_POSITIONS.iter().map(|p| p.singular_name()).collect(),
        })
    }

    /// Map the API's numeric element type (1..=4) to a position.
    pub fn from_element_type(element_type: u8) -> Option<Self> {
        match element_type {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    /// The API's singular name for this position.
    pub fn singular_name(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        }
    }

    /// Three-letter code used on the game's site.
    pub fn short_code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    pub fn profile(&self) -> Profile {
        match self {
            Position::Goalkeeper | Position::Defender => Profile::Defensive,
            Position::Midfielder | Position::Forward => Profile::Offensive,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.singular_name())
    }
}

/// Coarse role grouping used to decide which club preference list applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    Defensive,
    Offensive,
}

impl Profile {
    pub fn label(&self) -> &'static str {
        match self {
            Profile::Defensive => "defensive",
            Profile::Offensive => "offensive",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One selectable player.
///
/// `performance` and `value` are derived scores whose meaning depends on the
/// data regime: in-season data blends form with points-per-game and uses the
/// API's season value, while the predicted regime fills both from a model's
/// predicted points-per-game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable player id, unique within a pool.
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub club_id: u32,
    pub club: String,
    /// Price in the smallest currency unit (tenths of a million in the game).
    pub price: u32,
    /// Chance of playing this round, 0..=100. `None` usually means no news,
    /// i.e. the player is likely to play.
    pub availability: Option<f64>,
    pub form: f64,
    pub points_per_game: f64,
    pub performance: f64,
    pub value: f64,
    pub total_points: i32,
    #[serde(default)]
    pub starts: u32,
}

impl Candidate {
    /// Blend of short-term form and season points-per-game.
    pub fn blended_performance(form: f64, points_per_game: f64) -> f64 {
        (form + points_per_game) / 2.0
    }

    /// Value for money of a predicted points-per-game figure.
    ///
    /// Returns 0.0 for free players rather than dividing by zero.
    pub fn predicted_value(predicted_ppg: f64, price: u32) -> f64 {
        if price == 0 {
            return 0.0;
        }
        predicted_ppg / price as f64 * 10.0
    }

    /// Availability with a missing value replaced by `missing_as`.
    pub fn availability_or(&self, missing_as: f64) -> f64 {
        self.availability.unwrap_or(missing_as)
    }

    pub fn profile(&self) -> Profile {
        self.position.profile()
    }
}
