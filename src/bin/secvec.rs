use anyhow::Result;
use chrono::Local;
use clap::Parser;
use secvec_rs::{Dictionary, Objective, TrainConfig, Trainer};
use std::path::PathBuf;

/// Train second-order skip-gram word vectors on the unit hypersphere.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Training corpus, one or more lines of whitespace-separated text
    #[clap(long, value_parser, required = true)]
    input: PathBuf,
    /// Output path prefix; .vec and .output are appended
    #[clap(long, value_parser, required = true)]
    output: PathBuf,
    /// Size of the word vectors
    #[clap(long, value_parser, default_value_t = 100)]
    dim: usize,
    /// Context window size
    #[clap(long, value_parser, default_value_t = 5)]
    ws: usize,
    /// Number of training epochs
    #[clap(long, value_parser, default_value_t = 5)]
    epoch: usize,
    /// Negatives sampled per positive
    #[clap(long, value_parser, default_value_t = 5)]
    neg: usize,
    /// Initial learning rate, annealed linearly to zero
    #[clap(long, value_parser, default_value_t = 0.05)]
    lr: f64,
    /// Worker threads the corpus is split over
    #[clap(long, value_parser, default_value_t = 1)]
    thread: usize,
    /// Minimal number of word occurrences
    #[clap(long, value_parser, default_value_t = 100)]
    min_count: u64,
    /// Maximal vocabulary size
    #[clap(long, value_parser, default_value_t = 100_000)]
    max_vocab: usize,
    /// Training objective: secvec or skipgram
    #[clap(long, value_parser, default_value = "secvec")]
    loss: String,
    /// Also write the vocabulary, one "word count" line per word
    #[clap(long, value_parser)]
    save_vocab: Option<PathBuf>,
    #[clap(long, value_parser, default_value_t = 0, help = "0: text, 1: binary, 2: both")]
    binary: i32,
    /// Random seed; 0 derives one from the clock
    #[clap(long, value_parser, default_value_t = 0)]
    seed: u64,
    #[clap(short, long, value_parser, default_value_t = 2)]
    verbose: i32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let objective = Objective::from_name(&cli.loss)?;

    if cli.verbose > 0 {
        let time_str = Local::now().format("%x - %I:%M.%S%p");
        eprintln!("{time_str} building vocabulary from {}", cli.input.display());
    }
    let dict = Dictionary::build(&cli.input, cli.min_count, cli.max_vocab, cli.verbose)?;
    if let Some(path) = &cli.save_vocab {
        dict.save_vocab(path)?;
    }

    let config = TrainConfig {
        corpus: cli.input,
        save_prefix: cli.output,
        dim: cli.dim,
        window: cli.ws,
        epochs: cli.epoch,
        neg: cli.neg,
        lr: cli.lr,
        threads: cli.thread,
        objective,
        binary: cli.binary,
        seed: cli.seed,
        verbose: cli.verbose,
    };
    let trainer = Trainer::new(&dict, &config);
    let stats = trainer.train()?;
    trainer.save_vectors()?;

    if cli.verbose > 0 {
        let time_str = Local::now().format("%x - %I:%M.%S%p");
        eprintln!("{time_str} done, {} tokens trained", stats.tokens);
    }
    Ok(())
}
