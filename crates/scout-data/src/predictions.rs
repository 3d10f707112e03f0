// Model predictions for the early-season regime.
//
// Before enough gameweeks have been played, live form says little, so the
// scout ranks players by a predicted points-per-game produced offline from
// the previous two seasons. Predictions arrive as a CSV keyed by player id.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use scout_core::Candidate;

use crate::error::DataError;

/// Players need at least this fraction of the most-used player's starts to
/// stay in the predicted pool.
pub const DEFAULT_MIN_STARTS_FRACTION: f64 = 0.6;

#[derive(Debug, Deserialize)]
struct RawPrediction {
    id: u32,
    predicted_ppg: f64,
}

fn load_predictions_from_reader<R: Read>(rdr: R) -> Result<HashMap<u32, f64>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut map = HashMap::new();
    for result in reader.deserialize::<RawPrediction>() {
        match result {
            Ok(raw) => {
                if !raw.predicted_ppg.is_finite() {
                    warn!("skipping prediction for player {}: non-finite value", raw.id);
                    continue;
                }
                if map.insert(raw.id, raw.predicted_ppg).is_some() {
                    warn!("duplicate prediction for player {}, using latest value", raw.id);
                }
            }
            Err(e) => {
                warn!("skipping malformed prediction row: {}", e);
            }
        }
    }
    Ok(map)
}

/// Load predicted points-per-game by player id from a CSV file with an
/// `id,predicted_ppg` header.
pub fn load_predictions(path: &Path) -> Result<HashMap<u32, f64>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_predictions_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Rescore `candidates` from predictions for the predicted regime.
///
/// Candidates without a prediction are dropped, as are those with fewer than
/// `min_starts_fraction` of the highest start count among the rest.
/// `performance` becomes the predicted points-per-game and `value` the
/// predicted points per price unit.
pub fn apply_predictions(
    candidates: &[Candidate],
    predictions: &HashMap<u32, f64>,
    min_starts_fraction: f64,
) -> Result<Vec<Candidate>, DataError> {
    let predicted: Vec<Candidate> = candidates
        .iter()
        .filter_map(|c| {
            let ppg = *predictions.get(&c.id)?;
            let mut c = c.clone();
            c.performance = ppg;
            c.value = Candidate::predicted_value(ppg, c.price);
            Some(c)
        })
        .collect();

    if predicted.is_empty() {
        return Err(DataError::Unavailable(
            "no candidate has a prediction".into(),
        ));
    }

    let max_starts = predicted.iter().map(|c| c.starts).max().unwrap_or(0);
    let threshold = min_starts_fraction * f64::from(max_starts);
    let pool: Vec<Candidate> = predicted
        .into_iter()
        .filter(|c| f64::from(c.starts) >= threshold)
        .collect();

    info!(
        "predicted pool: {} of {} candidates (starts >= {:.1})",
        pool.len(),
        candidates.len(),
        threshold
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::Position;

    fn candidate(id: u32, price: u32, starts: u32) -> Candidate {
        Candidate {
            id,
            name: format!("P{id}"),
            position: Position::Midfielder,
            club_id: 1,
            club: "Club".into(),
            price,
            availability: None,
            form: 9.0,
            points_per_game: 9.0,
            performance: 9.0,
            value: 99.0,
            total_points: 0,
            starts,
        }
    }

    #[test]
    fn reader_skips_malformed_rows() {
        let csv = "id,predicted_ppg,model\n1,5.5,xgb\n2,abc,xgb\n3,4.0,xgb\n1,6.0,xgb\n";
        let map = load_predictions_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&1], 6.0);
        assert_eq!(map[&3], 4.0);
    }

    #[test]
    fn rescoring_and_starts_filter() {
        let candidates = vec![candidate(1, 50, 30), candidate(2, 100, 10), candidate(3, 80, 20), candidate(4, 40, 38)];
        let predictions = HashMap::from([(1, 5.0), (2, 7.0), (3, 4.0)]);

        let pool = apply_predictions(&candidates, &predictions, DEFAULT_MIN_STARTS_FRACTION).unwrap();
        // Max starts among predicted players is 30, threshold 18.
        let ids: Vec<u32> = pool.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(pool[0].performance, 5.0);
        assert!((pool[0].value - 1.0).abs() < 1e-9);
        assert!((pool[1].value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn no_predictions_is_unavailable() {
        let candidates = vec![candidate(1, 50, 30)];
        let err = apply_predictions(&candidates, &HashMap::new(), 0.6).unwrap_err();
        assert!(matches!(err, DataError::Unavailable(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_predictions(Path::new("/nonexistent/predictions.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
