// Raw payloads of the fantasy game's public API.
//
// Only the fields the scout uses are declared; everything else in the
// responses is ignored. The API encodes most decimals as strings ("5.3"),
// so those fields go through `string_or_number`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use scout_core::{ClubStrength, Fixture};

pub const DEFAULT_BOOTSTRAP_URL: &str = "https://fantasy.premierleague.com/api/bootstrap-static/";
pub const DEFAULT_FIXTURES_URL: &str = "https://fantasy.premierleague.com/api/fixtures/";

// ---------------------------------------------------------------------------
// bootstrap-static
// ---------------------------------------------------------------------------

/// The `bootstrap-static` document: players, positions, clubs and gameweeks.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapStatic {
    pub elements: Vec<RawElement>,
    pub element_types: Vec<RawElementType>,
    pub teams: Vec<RawTeam>,
}

/// One player ("element") as published by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    pub id: u32,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    #[serde(default)]
    pub web_name: String,
    pub element_type: u8,
    pub team: u32,
    pub now_cost: u32,
    #[serde(default)]
    pub chance_of_playing_this_round: Option<f64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub form: f64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub points_per_game: f64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub value_season: f64,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub starts: u32,
}

impl RawElement {
    /// "First Last", falling back to the web name when either part is missing.
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let second = self.second_name.trim();
        if first.is_empty() || second.is_empty() {
            return self.web_name.trim().to_string();
        }
        format!("{first} {second}")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawElementType {
    pub id: u8,
    pub singular_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub strength: i32,
    pub strength_overall_home: i32,
    pub strength_overall_away: i32,
    pub strength_attack_home: i32,
    pub strength_attack_away: i32,
    pub strength_defence_home: i32,
    pub strength_defence_away: i32,
}

impl From<&RawTeam> for ClubStrength {
    fn from(t: &RawTeam) -> Self {
        ClubStrength {
            id: t.id,
            name: t.name.clone(),
            overall: t.strength,
            overall_home: t.strength_overall_home,
            overall_away: t.strength_overall_away,
            attack_home: t.strength_attack_home,
            attack_away: t.strength_attack_away,
            defence_home: t.strength_defence_home,
            defence_away: t.strength_defence_away,
        }
    }
}

// ---------------------------------------------------------------------------
// fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawFixture {
    pub id: u32,
    /// Gameweek; null while a postponed match is unscheduled.
    pub event: Option<u32>,
    #[serde(default)]
    pub finished: bool,
    pub team_h: u32,
    pub team_a: u32,
    #[serde(default)]
    pub team_h_difficulty: u8,
    #[serde(default)]
    pub team_a_difficulty: u8,
    #[serde(default)]
    pub kickoff_time: Option<DateTime<Utc>>,
}

impl From<&RawFixture> for Fixture {
    fn from(f: &RawFixture) -> Self {
        Fixture {
            id: f.id,
            round: f.event,
            finished: f.finished,
            home: f.team_h,
            away: f.team_a,
            home_difficulty: f.team_h_difficulty,
            away_difficulty: f.team_a_difficulty,
            kickoff_time: f.kickoff_time,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Accept `"5.3"`, `5.3` or `null` (as 0.0). `"NaN"` and `"inf"` are errors.
fn string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    let n = match Option::<NumOrStr>::deserialize(deserializer)? {
        None => return Ok(0.0),
        Some(NumOrStr::Num(n)) => n,
        Some(NumOrStr::Str(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(0.0);
            }
            s.parse::<f64>().map_err(serde::de::Error::custom)?
        }
    };
    if !n.is_finite() {
        return Err(serde::de::Error::custom(format!("non-finite decimal {n}")));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_accepts_string_and_number_decimals() {
        let json = r#"{
            "id": 7, "first_name": "Bukayo", "second_name": "Saka", "web_name": "Saka",
            "element_type": 3, "team": 1, "now_cost": 100,
            "chance_of_playing_this_round": null,
            "form": "6.5", "points_per_game": 5.75, "value_season": null,
            "total_points": 180, "starts": 30, "news": "ignored"
        }"#;
        let e: RawElement = serde_json::from_str(json).unwrap();
        assert_eq!(e.id, 7);
        assert!((e.form - 6.5).abs() < f64::EPSILON);
        assert!((e.points_per_game - 5.75).abs() < f64::EPSILON);
        assert_eq!(e.value_season, 0.0);
        assert_eq!(e.chance_of_playing_this_round, None);
        assert_eq!(e.full_name(), "Bukayo Saka");
    }

    #[test]
    fn malformed_decimal_is_an_error() {
        let json = r#"{"id": 1, "element_type": 1, "team": 1, "now_cost": 40, "form": "n/a"}"#;
        assert!(serde_json::from_str::<RawElement>(json).is_err());
    }

    #[test]
    fn non_finite_decimal_is_an_error() {
        for form in ["NaN", "inf", "-Infinity"] {
            let json = format!(
                r#"{{"id": 1, "element_type": 3, "team": 1, "now_cost": 50, "form": "{form}"}}"#
            );
            assert!(serde_json::from_str::<RawElement>(&json).is_err(), "{form} accepted");
        }
        let json = r#"{"id": 1, "element_type": 3, "team": 1, "now_cost": 50, "value_season": "nan"}"#;
        assert!(serde_json::from_str::<RawElement>(json).is_err());
    }

    #[test]
    fn full_name_falls_back_to_web_name() {
        let json = r#"{"id": 1, "web_name": "Alisson", "element_type": 1, "team": 12, "now_cost": 55}"#;
        let e: RawElement = serde_json::from_str(json).unwrap();
        assert_eq!(e.full_name(), "Alisson");
    }

    #[test]
    fn fixture_conversion() {
        let json = r#"{
            "id": 10, "event": 3, "finished": false, "team_h": 1, "team_a": 2,
            "team_h_difficulty": 2, "team_a_difficulty": 4,
            "kickoff_time": "2024-08-31T14:00:00Z"
        }"#;
        let raw: RawFixture = serde_json::from_str(json).unwrap();
        let f = Fixture::from(&raw);
        assert_eq!(f.round, Some(3));
        assert_eq!(f.difficulty_for(2), Some(4));
        assert!(f.kickoff_time.is_some());

        let json = r#"{"id": 11, "event": null, "team_h": 1, "team_a": 2, "kickoff_time": null}"#;
        let raw: RawFixture = serde_json::from_str(json).unwrap();
        assert!(!Fixture::from(&raw).is_upcoming());
    }
}
