// Season data for the scout: the game's public API, offline snapshots and
// model predictions, turned into scout-core types.

pub mod api;
pub mod error;
pub mod predictions;
pub mod provider;
pub mod season;
pub mod snapshot;

pub use error::DataError;
pub use provider::{fetch_all, DataProvider, HttpProvider, SnapshotProvider};
pub use snapshot::SeasonSnapshot;
