// Error types for squad selection.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// An unrecognised position or ranking target name.
    #[error("invalid {argument}: '{value}'; allowed values are: {}", allowed.join(", "))]
    InvalidArgument {
        argument: String,
        value: String,
        allowed: Vec<&'static str>,
    },

    /// The search finished without a single candidate in the squad.
    #[error("no feasible roster: {reason}")]
    NoFeasibleRoster { reason: String },
}
