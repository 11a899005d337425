use crate::helpers::{init_tracing, respondent};
use claims::{assert_gt, assert_matches, assert_ok};
use pairwise_strength::estimator::estimate;
use pairwise_strength::numerical::is_distribution;
use pairwise_strength::{
    Error, EstimatorConfig, PairIndex, RecordPolicy, Respondent, Termination, aggregate,
};

#[test]
fn three_items_fully_judged_twice() {
    init_tracing();
    let pairs = PairIndex::new(3);
    let verdicts = [(0, 1), (0, 2), (1, 2)];
    let respondents = vec![
        respondent("user0", &pairs, &verdicts),
        respondent("user1", &pairs, &verdicts),
    ];

    let counts = aggregate(&pairs, &respondents, RecordPolicy::RejectRun).unwrap();
    assert_eq!(counts.won_by, vec![4, 2, 0]);
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(counts.comparisons[i][j], if i == j { 0 } else { 2 });
        }
    }

    let config = EstimatorConfig::new(3)
        .with_threshold_precision(1e-6)
        .with_max_iterations(10_000);
    let estimate = estimate(&counts, &config).unwrap();
    let p = &estimate.strengths;
    assert_eq!(estimate.termination, Termination::Converged);
    assert!(estimate.iterations < config.max_iterations);
    assert!(is_distribution(p, 1e-9));
    assert_gt!(p[0], p[1]);
    assert_gt!(p[1], p[2]);
}

#[test]
fn abstaining_respondent_is_as_if_absent() {
    init_tracing();
    let pairs = PairIndex::new(5);
    let mut respondents = vec![
        respondent("a", &pairs, &[(0, 1), (2, 1), (3, 4), (0, 4), (1, 3)]),
        respondent("b", &pairs, &[(1, 0), (1, 2), (4, 3), (0, 2), (3, 2)]),
        respondent("c", &pairs, &[(0, 1), (2, 3), (4, 0), (1, 4), (2, 0)]),
    ];
    let config = EstimatorConfig::new(5).with_threshold_precision(1e-11);

    let without = aggregate(&pairs, &respondents, RecordPolicy::RejectRun).unwrap();
    let estimate_without = estimate(&without, &config).unwrap();

    respondents.insert(1, Respondent::abstaining("idle", pairs.len()));
    let with = aggregate(&pairs, &respondents, RecordPolicy::RejectRun).unwrap();
    let estimate_with = estimate(&with, &config).unwrap();

    assert_eq!(with.won_by, without.won_by);
    assert_eq!(with.duel_won_by, without.duel_won_by);
    assert_eq!(with.comparisons, without.comparisons);
    assert_eq!(estimate_with, estimate_without);
}

#[test]
fn winner_beats_loser_and_absent_item_vanishes() {
    init_tracing();
    // Item 0 wins all its duels, item 3 loses all of its, item 4 is never judged
    let pairs = PairIndex::new(5);
    let respondents = vec![
        respondent("a", &pairs, &[(0, 1), (0, 3), (1, 2), (2, 3)]),
        respondent("b", &pairs, &[(0, 2), (2, 1), (1, 3)]),
        respondent("c", &pairs, &[(0, 1), (1, 2)]),
    ];
    let counts = aggregate(&pairs, &respondents, RecordPolicy::RejectRun).unwrap();
    assert_eq!(counts.appearances(4), 0);

    let config = EstimatorConfig::new(5).with_max_iterations(500);
    let estimate = estimate(&counts, &config).unwrap();
    let p = &estimate.strengths;

    assert!(is_distribution(p, 1e-9));
    assert!(p.iter().all(|x| x.is_finite()));
    assert_gt!(p[0], p[3]);
    assert_eq!(p[3], 0.);
    assert_eq!(p[4], 0.);
    assert_eq!(estimate.zero_strength_items, 2);
}

#[test]
fn estimation_is_deterministic() {
    init_tracing();
    let pairs = PairIndex::new(4);
    let respondents = vec![
        respondent("a", &pairs, &[(0, 1), (2, 3), (1, 2), (3, 0)]),
        respondent("b", &pairs, &[(1, 0), (3, 2), (0, 2), (1, 3)]),
    ];
    let counts = aggregate(&pairs, &respondents, RecordPolicy::RejectRun).unwrap();
    let config = EstimatorConfig::new(4);

    let first = estimate(&counts, &config);
    let second = estimate(&counts, &config);
    assert_ok!(first.as_ref());
    assert_eq!(first.unwrap(), second.unwrap());
}

#[test]
fn only_abstentions_is_a_degenerate_run() {
    init_tracing();
    let pairs = PairIndex::new(17);
    let respondents: Vec<_> = (0..3)
        .map(|k| Respondent::abstaining(format!("user{}", k), pairs.len()))
        .collect();
    let counts = aggregate(&pairs, &respondents, RecordPolicy::RejectRun).unwrap();

    assert_matches!(
        estimate(&counts, &EstimatorConfig::new(17)),
        Err(Error::DegenerateRun)
    );
}

#[test]
fn item_count_is_a_parameter() {
    init_tracing();
    for num_items in [2, 3, 17, 30] {
        let pairs = PairIndex::new(num_items);
        // A round robin where the lower index wins, except the last pair is reversed
        let mut verdicts: Vec<_> = pairs.iter().collect();
        let last = verdicts.len() - 1;
        verdicts[last] = (verdicts[last].1, verdicts[last].0);
        let respondents = vec![respondent("rr", &pairs, &verdicts)];

        let counts = aggregate(&pairs, &respondents, RecordPolicy::RejectRun).unwrap();
        let estimate = estimate(&counts, &EstimatorConfig::new(num_items)).unwrap();
        assert_eq!(estimate.strengths.len(), num_items);
        assert!(is_distribution(&estimate.strengths, 1e-9));
    }
}
