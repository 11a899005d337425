use thiserror::Error;

/// A respondent record that cannot be interpreted over the pair mapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("respondent {respondent} has {found} judgments, expected {expected}")]
    WrongLength {
        respondent: String,
        expected: usize,
        found: usize,
    },

    #[error("respondent {respondent}, slot {slot}: {value:?} is not a judgment code (-1, 0 or 1)")]
    UnknownJudgment {
        respondent: String,
        slot: usize,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    #[error("Degenerate run: no judged comparisons, strengths cannot be normalized")]
    DegenerateRun,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json5(#[from] json5::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
