use super::{Judgment, Respondent};
use crate::pairs::PairIndex;
use rand::Rng;

/// Respondents whose every judgment is drawn uniformly from the three states.
pub fn uniform_respondents(
    pairs: &PairIndex,
    num_respondents: usize,
    rng: &mut impl Rng,
) -> Vec<Respondent> {
    (0..num_respondents)
        .map(|k| {
            let judgments = (0..pairs.len())
                .map(|_| match rng.random_range(0..3) {
                    0 => Judgment::Abstained,
                    1 => Judgment::SecondWon,
                    _ => Judgment::FirstWon,
                })
                .collect();
            Respondent::new(format!("user{}", k), judgments)
        })
        .collect()
}

/// Respondents who skip each pair with probability `abstain_prob`, and otherwise
/// pick the winner of `(i, j)` with the Bradley-Terry odds `s_i / (s_i + s_j)`.
///
/// # Panics
///
/// Panics if `abstain_prob` is outside `[0, 1]`, or if some pair has zero total strength.
pub fn bradley_terry_respondents(
    strengths: &[f64],
    num_respondents: usize,
    abstain_prob: f64,
    rng: &mut impl Rng,
) -> Vec<Respondent> {
    let pairs = PairIndex::new(strengths.len());
    (0..num_respondents)
        .map(|k| {
            let judgments = pairs
                .iter()
                .map(|(i, j)| {
                    if rng.random_bool(abstain_prob) {
                        Judgment::Abstained
                    } else if rng.random_bool(strengths[i] / (strengths[i] + strengths[j])) {
                        Judgment::FirstWon
                    } else {
                        Judgment::SecondWon
                    }
                })
                .collect();
            Respondent::new(format!("user{}", k), judgments)
        })
        .collect()
}
