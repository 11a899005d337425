use pairwise_strength::PairIndex;
use pairwise_strength::data_processing::{uniform_respondents, write_respondents_csv};
use pairwise_strength::telemetry::init_cli_logging;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Writes uniformly random judgments, readable by the `estimate` binary
fn main() {
    init_cli_logging("synthesize");

    let args: Vec<String> = std::env::args().collect();
    let parsed = (|| {
        let num_items: usize = args.get(1)?.parse().ok()?;
        let num_respondents: usize = args.get(2)?.parse().ok()?;
        let seed: u64 = args.get(3)?.parse().ok()?;
        Some((num_items, num_respondents, seed, args.get(4)?))
    })();
    let Some((num_items, num_respondents, seed, out_file)) = parsed else {
        tracing::error!(
            "Usage: {} num_items num_respondents seed out.csv",
            args.first().map_or("synthesize", String::as_str)
        );
        std::process::exit(2);
    };

    let pairs = PairIndex::new(num_items);
    let respondents = uniform_respondents(&pairs, num_respondents, &mut StdRng::seed_from_u64(seed));
    match write_respondents_csv(&respondents, out_file) {
        Ok(()) => tracing::info!(
            "Wrote {} respondents over {} pairs to {}",
            respondents.len(),
            pairs.len(),
            out_file
        ),
        Err(err) => {
            tracing::error!("Failed to write {}: {}", out_file, err);
            std::process::exit(1);
        }
    }
}
