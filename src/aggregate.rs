use crate::data_processing::{Judgment, Respondent};
use crate::error::{MalformedInput, Result};
use crate::pairs::PairIndex;
use serde::Deserialize;

/// What to do with a respondent record that doesn't fit the pair mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Fail the whole run on the first malformed record.
    #[default]
    RejectRun,
    /// Log and drop the record, then continue.
    SkipRecord,
}

/// Win and comparison counts between every pair of items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonCounts {
    num_items: usize,
    /// `won_by[i]`: total wins credited to item `i`.
    pub won_by: Vec<u64>,
    /// `duel_won_by[i][j]`: times item `i` beat item `j`.
    pub duel_won_by: Vec<Vec<u64>>,
    /// `comparisons[i][j]`: non-abstained judgments between `i` and `j`; symmetric.
    pub comparisons: Vec<Vec<u64>>,
    /// Respondents whose records were counted.
    pub respondents: usize,
    /// Respondents dropped under `RecordPolicy::SkipRecord`.
    pub skipped_respondents: usize,
}

impl ComparisonCounts {
    pub fn zeros(num_items: usize) -> Self {
        Self {
            num_items,
            won_by: vec![0; num_items],
            duel_won_by: vec![vec![0; num_items]; num_items],
            comparisons: vec![vec![0; num_items]; num_items],
            respondents: 0,
            skipped_respondents: 0,
        }
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Total number of non-abstained judgments.
    pub fn total_judgments(&self) -> u64 {
        self.won_by.iter().sum()
    }

    /// Number of judged comparisons item `i` took part in.
    pub fn appearances(&self, i: usize) -> u64 {
        self.comparisons[i].iter().sum()
    }

    fn record(&mut self, (i0, i1): (usize, usize), judgment: Judgment) {
        let (winner, loser) = match judgment {
            Judgment::Abstained => return,
            Judgment::FirstWon => (i0, i1),
            Judgment::SecondWon => (i1, i0),
        };
        self.duel_won_by[winner][loser] += 1;
        self.won_by[winner] += 1;
        self.comparisons[i0][i1] += 1;
        self.comparisons[i1][i0] += 1;
    }
}

fn check_length(pairs: &PairIndex, respondent: &Respondent) -> Result<(), MalformedInput> {
    if respondent.judgments.len() == pairs.len() {
        Ok(())
    } else {
        Err(MalformedInput::WrongLength {
            respondent: respondent.id.clone(),
            expected: pairs.len(),
            found: respondent.judgments.len(),
        })
    }
}

/// Counts wins and comparisons over every respondent's judgments in one pass.
///
/// Every record must hold exactly one judgment per slot of `pairs`. Records that
/// don't are handled according to `policy`; they are never truncated or padded.
pub fn aggregate<'a>(
    pairs: &PairIndex,
    respondents: impl IntoIterator<Item = &'a Respondent>,
    policy: RecordPolicy,
) -> Result<ComparisonCounts> {
    let mut counts = ComparisonCounts::zeros(pairs.num_items());
    for respondent in respondents {
        if let Err(err) = check_length(pairs, respondent) {
            match policy {
                RecordPolicy::RejectRun => return Err(err.into()),
                RecordPolicy::SkipRecord => {
                    tracing::warn!("Skipping respondent: {}", err);
                    counts.skipped_respondents += 1;
                    continue;
                }
            }
        }
        for (pair, &judgment) in pairs.iter().zip(&respondent.judgments) {
            counts.record(pair, judgment);
        }
        counts.respondents += 1;
    }
    tracing::debug!(
        "Aggregated {} judgments from {} respondents ({} skipped)",
        counts.total_judgments(),
        counts.respondents,
        counts.skipped_respondents
    );
    Ok(counts)
}
