mod synthetic;

pub use synthetic::{bradley_terry_respondents, uniform_respondents};

use crate::aggregate::RecordPolicy;
use crate::error::{MalformedInput, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::path::Path;

/// A single respondent's verdict on one pair `(i0, i1)` of the pair mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Judgment {
    /// The pair's first item `i0` won.
    FirstWon,
    /// The pair's second item `i1` won.
    SecondWon,
    /// The respondent did not compare the pair.
    Abstained,
}

impl Judgment {
    /// Decodes the ternary discriminator: `1`, `0`, or `-1` for abstain.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::FirstWon),
            0 => Some(Self::SecondWon),
            -1 => Some(Self::Abstained),
            _ => None,
        }
    }

    pub fn code(self) -> i8 {
        match self {
            Self::FirstWon => 1,
            Self::SecondWon => 0,
            Self::Abstained => -1,
        }
    }

    pub fn is_abstained(self) -> bool {
        self == Self::Abstained
    }
}

/// The raw input to aggregation: one respondent's judgments, indexed by slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Respondent {
    pub id: String,
    pub judgments: Vec<Judgment>,
}

impl Respondent {
    pub fn new(id: impl Into<String>, judgments: Vec<Judgment>) -> Self {
        Self {
            id: id.into(),
            judgments,
        }
    }

    /// A respondent who judged none of the `num_pairs` pairs.
    pub fn abstaining(id: impl Into<String>, num_pairs: usize) -> Self {
        Self::new(id, vec![Judgment::Abstained; num_pairs])
    }

    /// Number of non-abstained judgments.
    pub fn num_judged(&self) -> usize {
        self.judgments.iter().filter(|j| !j.is_abstained()).count()
    }
}

fn parse_record(record: &csv::StringRecord) -> Result<Respondent, MalformedInput> {
    let id = record.get(0).unwrap_or_default().trim().to_owned();
    let judgments = record
        .iter()
        .skip(1)
        .enumerate()
        .map(|(slot, field)| {
            field
                .trim()
                .parse()
                .ok()
                .and_then(Judgment::from_code)
                .ok_or_else(|| MalformedInput::UnknownJudgment {
                    respondent: id.clone(),
                    slot,
                    value: field.to_owned(),
                })
        })
        .collect::<Result<_, _>>()?;
    Ok(Respondent { id, judgments })
}

/// Reads `;`-separated rows of the form `id;code;code;...` with no header.
/// Record lengths are left for the aggregator to check.
pub fn read_respondents_csv(
    path: impl AsRef<Path>,
    policy: RecordPolicy,
) -> Result<Vec<Respondent>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut respondents = vec![];
    for record in reader.records() {
        match parse_record(&record?) {
            Ok(respondent) => respondents.push(respondent),
            Err(err) if policy == RecordPolicy::SkipRecord => {
                tracing::warn!("Skipping record in {:?}: {}", path, err);
            }
            Err(err) => return Err(err.into()),
        }
    }
    tracing::info!("Read {} respondents from {:?}", respondents.len(), path);
    Ok(respondents)
}

/// Writes respondents in the format accepted by `read_respondents_csv`.
pub fn write_respondents_csv(respondents: &[Respondent], path: impl AsRef<Path>) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;
    for respondent in respondents {
        let codes = respondent.judgments.iter().map(|j| j.code().to_string());
        writer.write_record(std::iter::once(respondent.id.clone()).chain(codes))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_to_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn write_to_csv<T: Serialize>(values: &[T], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for val in values {
        writer.serialize(val)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `values` as JSON or CSV, chosen by the file extension.
pub fn write_slice_to_file<T: Serialize>(values: &[T], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => write_to_json(values, path),
        Some("csv") => write_to_csv(values, path),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid or missing filename extension: {:?}", path),
        )
        .into()),
    }
}

/// Like `write_slice_to_file`, but only logs the outcome.
pub fn try_write_slice_to_file<T: Serialize>(values: &[T], path: impl AsRef<Path>) {
    let path = path.as_ref();
    match write_slice_to_file(values, path) {
        Ok(()) => tracing::info!("Successfully wrote to {:?}", path),
        Err(err) => tracing::error!("WARNING: failed write to {:?} because {}", path, err),
    };
}
