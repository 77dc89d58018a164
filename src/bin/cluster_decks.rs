use clap::Parser;

use deck_clustering::constants::{FIRST_CARD_COLUMN, K, LABEL_COLUMN};
use deck_clustering::deck_reader::{read_decks, DeckLayout};
use deck_clustering::{Clusterer, ClustererOptions};
use std::error::Error;
use std::result::Result;
use tracing::warn;

#[derive(Parser)]
#[clap(version = "1.0", author = "Kyle <kmurf1999@gmail.com>")]
struct Opts {
    /// deck csv with a header row
    #[clap(long, default_value = "hearthstone_decks.csv")]
    file: String,
    #[clap(long, default_value = LABEL_COLUMN)]
    label_column: String,
    #[clap(long, default_value_t = FIRST_CARD_COLUMN)]
    first_card_column: usize,
    /// seed for the random starting centroids
    #[clap(long)]
    seed: Option<u64>,
    /// give up after this many rounds instead of looping until convergence
    #[clap(long)]
    max_rounds: Option<usize>,
    /// print the full report as json
    #[clap(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let opts: Opts = Opts::parse();
    let layout = DeckLayout {
        label_column: opts.label_column,
        first_card_column: opts.first_card_column,
    };
    let definitions = read_decks(&opts.file, &layout)?;

    let clusterer = Clusterer::init(ClustererOptions {
        definitions,
        k: K,
        max_rounds: opts.max_rounds,
        seed: opts.seed,
    })?;

    let report = clusterer.run_and_evaluate(&mut |round| {
        println!("Clustering Round: {} complete", round);
    })?;

    if !report.converged {
        warn!(rounds = report.rounds, "clustering did not converge");
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Accuracy: {}", report.evaluation.accuracy);
    }
    Ok(())
}
