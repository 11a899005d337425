//! Bradley-Terry strength estimation from pairwise judgments.
//!
//! Respondents judge pairs of items; the judgments are aggregated into win and
//! comparison counts, and the MM fixed point turns those counts into a
//! normalized strength vector.

pub mod aggregate;
pub mod data_processing;
pub mod error;
pub mod estimator;
pub mod experiment_config;
pub mod numerical;
pub mod pairs;
pub mod summary;
pub mod telemetry;

pub use aggregate::{ComparisonCounts, RecordPolicy, aggregate};
pub use data_processing::{Judgment, Respondent};
pub use error::{Error, MalformedInput};
pub use estimator::{Estimate, EstimatorConfig, EstimatorState, MmEstimator, Termination};
pub use pairs::PairIndex;
