use crate::helpers::init_tracing;
use claims::assert_matches;
use pairwise_strength::data_processing::{read_respondents_csv, write_respondents_csv};
use pairwise_strength::experiment_config::{Experiment, ExperimentConfig};
use pairwise_strength::summary::{StrengthSummary, make_leaderboard};
use pairwise_strength::{Error, MalformedInput, RecordPolicy};
use tempfile::tempdir;

#[test]
fn experiment_from_config_file_over_csv() {
    init_tracing();
    let dir = tempdir().unwrap();
    let data = dir.path().join("survey.csv");
    let table = dir.path().join("strengths.json");
    let config_file = dir.path().join("experiment.json5");

    // 3 items; slots (0,1), (0,2), (1,2)
    std::fs::write(&data, "user0;1;1;0\nuser1;1;0;1\nuser2;0;1;1\nuser3;-1;-1;-1\n").unwrap();
    std::fs::write(
        &config_file,
        format!(
            r#"{{
                name: "survey",
                estimator: {{ num_items: 3, threshold_precision: 1e-10, max_iterations: 1000 }},
                source: {{ kind: "csv", path: {:?} }},
                output: {:?},
            }}"#,
            data, table
        ),
    )
    .unwrap();

    let experiment = Experiment::from_file(&config_file).unwrap();
    assert_eq!(experiment.name, "survey");
    let results = experiment.eval().unwrap();
    assert_eq!(results.counts.respondents, 4);
    assert_eq!(results.counts.total_judgments(), 9);
    assert!(results.estimate.converged());

    let leaderboard = make_leaderboard(&results.counts, &results.estimate);
    pairwise_strength::data_processing::write_slice_to_file(&leaderboard, &table).unwrap();
    let written: Vec<StrengthSummary> =
        serde_json::from_str(&std::fs::read_to_string(&table).unwrap()).unwrap();

    // The JSON text may move a strength by an ulp; everything else is exact
    assert_eq!(written.len(), leaderboard.len());
    for (read_back, row) in written.iter().zip(&leaderboard) {
        assert_eq!(
            (read_back.rank, read_back.item, read_back.wins, read_back.comparisons),
            (row.rank, row.item, row.wins, row.comparisons)
        );
        assert!(
            (read_back.strength - row.strength).abs() < 1e-12,
            "{} vs {}",
            read_back.strength,
            row.strength
        );
    }
    // Item 0 won 4 of its 6 duels, more than anyone else
    assert_eq!(written[0].item, 0);
}

#[test]
fn wrong_length_record_fails_the_run() {
    init_tracing();
    let dir = tempdir().unwrap();
    let data = dir.path().join("short.csv");
    std::fs::write(&data, "user0;1;1;0\nuser1;1;0\n").unwrap();
    let config: ExperimentConfig = json5::from_str(&format!(
        r#"{{ estimator: {{ num_items: 3 }}, source: {{ kind: "csv", path: {:?} }} }}"#,
        data
    ))
    .unwrap();

    let experiment = Experiment::from_config(config).unwrap();
    assert_matches!(
        experiment.eval(),
        Err(Error::MalformedInput(MalformedInput::WrongLength {
            expected: 3,
            found: 2,
            ..
        }))
    );
}

#[test]
fn failed_experiment_reports_its_inputs() {
    init_tracing();
    let dir = tempdir().unwrap();
    let data = dir.path().join("idle.csv");
    std::fs::write(&data, "idle0;-1;-1;-1\nidle1;-1;-1;-1\n").unwrap();
    let config: ExperimentConfig = json5::from_str(&format!(
        r#"{{ name: "idle", estimator: {{ num_items: 3 }}, source: {{ kind: "csv", path: {:?} }} }}"#,
        data
    ))
    .unwrap();

    let outcome = Experiment::from_config(config);
    assert_matches!(&outcome, Ok(experiment) if experiment.respondents.len() == 2);
    let experiment = outcome.unwrap();
    let listing = format!("{:?}", experiment);
    assert!(listing.contains("idle1"), "{}", listing);
    assert_matches!(experiment.eval(), Err(Error::DegenerateRun));
}

#[test]
fn generated_data_survives_the_csv_format() {
    init_tracing();
    let dir = tempdir().unwrap();
    let data = dir.path().join("generated.csv");
    let config: ExperimentConfig = json5::from_str(
        r#"{ estimator: { num_items: 17 }, source: { kind: "uniform", num_respondents: 150, seed: 11 } }"#,
    )
    .unwrap();
    let experiment = Experiment::from_config(config).unwrap();

    write_respondents_csv(&experiment.respondents, &data).unwrap();
    let read_back = read_respondents_csv(&data, RecordPolicy::RejectRun).unwrap();

    assert_eq!(read_back, experiment.respondents);
}
