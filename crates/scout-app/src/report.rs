// Squad report: fixture difficulty, advice per player and file export.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use scout_core::candidate::ALL_POSITIONS;
use scout_core::{Candidate, Fixture, Position};

pub const COMMENT_HARD_MATCHUPS: &str = "Consider benching (hard matchups)";
pub const COMMENT_WORST_PERFORMING: &str = "Consider benching/selling (worst performing)";
pub const COMMENT_EASIEST_MATCHUPS: &str = "Consider captaining (easiest matchups)";
pub const COMMENT_BIGGEST_STAR: &str = "Consider captaining (biggest star)";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// One squad member as written to the report files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub club: String,
    pub price: u32,
    pub performance: f64,
    pub value: f64,
    pub total_points: i32,
    pub fixtures_difficulty: u32,
    pub comment: Option<String>,
}

/// Sum of `club_id`'s difficulty ratings over its next `horizon`
/// unfinished fixtures.
pub fn fixture_difficulty(fixtures: &[Fixture], club_id: u32, horizon: usize) -> u32 {
    fixtures
        .iter()
        .filter(|f| !f.finished)
        .filter_map(|f| f.difficulty_for(club_id))
        .take(horizon)
        .map(u32::from)
        .sum()
}

/// Build the report rows for `members` in squad order and attach advice.
pub fn build_report(members: &[&Candidate], fixtures: &[Fixture], horizon: usize) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = members
        .iter()
        .map(|c| ReportRow {
            id: c.id,
            name: c.name.clone(),
            position: c.position,
            club: c.club.clone(),
            price: c.price,
            performance: c.performance,
            value: c.value,
            total_points: c.total_points,
            fixtures_difficulty: fixture_difficulty(fixtures, c.club_id, horizon),
            comment: None,
        })
        .collect();
    annotate(&mut rows);
    rows
}

/// Attach advice. Later rules overwrite earlier ones on the same row, and
/// ties go to the first row.
pub fn annotate(rows: &mut [ReportRow]) {
    let Some(last) = rows.len().checked_sub(1) else {
        return;
    };

    for pos in ALL_POSITIONS {
        if let Some(i) = first_extreme(rows, |r| r.position == pos, |r| r.fixtures_difficulty, true) {
            rows[i].comment = Some(COMMENT_HARD_MATCHUPS.into());
        }
    }

    rows[last].comment = Some(COMMENT_WORST_PERFORMING.into());

    if let Some(i) = first_extreme(rows, |_| true, |r| r.fixtures_difficulty, false) {
        rows[i].comment = Some(COMMENT_EASIEST_MATCHUPS.into());
    }
    if let Some(i) = first_extreme(rows, |_| true, |r| r.price, true) {
        rows[i].comment = Some(COMMENT_BIGGEST_STAR.into());
    }
}

/// Index of the first row with the largest (or smallest) key among rows
/// matching `filter`.
fn first_extreme<F, K>(rows: &[ReportRow], filter: F, key: K, largest: bool) -> Option<usize>
where
    F: Fn(&ReportRow) -> bool,
    K: Fn(&ReportRow) -> u32,
{
    let mut best: Option<(usize, u32)> = None;
    for (i, row) in rows.iter().enumerate().filter(|(_, r)| filter(r)) {
        let k = key(row);
        let better = match best {
            None => true,
            Some((_, b)) if largest => k > b,
            Some((_, b)) => k < b,
        };
        if better {
            best = Some((i, k));
        }
    }
    best.map(|(i, _)| i)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Base name of the report files for `date`, e.g. `2024-09-01-FPL-MyTeam`.
pub fn report_stem(date: NaiveDate) -> String {
    format!("{}-FPL-MyTeam", date.format("%Y-%m-%d"))
}

/// Write `rows` to `<dir>/<date>-FPL-MyTeam.json` and `.csv`, creating `dir`
/// if needed. Existing files for the same date are replaced.
pub fn export(rows: &[ReportRow], dir: &Path, date: NaiveDate) -> Result<ExportPaths, ReportError> {
    std::fs::create_dir_all(dir).map_err(|e| ReportError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let stem = report_stem(date);
    let paths = ExportPaths {
        json: dir.join(format!("{stem}.json")),
        csv: dir.join(format!("{stem}.csv")),
    };

    let json = serde_json::to_string_pretty(rows).map_err(|e| ReportError::Json {
        path: paths.json.clone(),
        source: e,
    })?;
    std::fs::write(&paths.json, json).map_err(|e| ReportError::Io {
        path: paths.json.clone(),
        source: e,
    })?;

    let csv_err = |e: csv::Error| ReportError::Csv {
        path: paths.csv.clone(),
        source: e,
    };
    let mut writer = csv::Writer::from_path(&paths.csv).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| ReportError::Io {
        path: paths.csv.clone(),
        source: e,
    })?;

    info!("report written to {} and {}", paths.json.display(), paths.csv.display());
    Ok(paths)
}
