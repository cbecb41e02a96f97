use clap::Parser;
use secvec_rs::WordVectors;
use std::io::{self, Write};
use std::path::PathBuf;

/// Rank the nearest words to a word or sentence, interactively.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Trained vector file (.vec text or .vec.bin binary)
    #[clap(long, value_parser, default_value = "vectors.vec")]
    model: PathBuf,
}

fn get_input() -> io::Result<String> {
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let word_vectors = WordVectors::from_file(&cli.model)?;

    println!("Near Words Tool - Type 'EXIT' to quit\n");
    loop {
        println!("\nRanking nearest words to a word or sentence.");
        print!("Enter 1 or more words: ");
        io::stdout().flush()?;
        let s = get_input()?;
        if s == "EXIT" {
            println!("Goodbye!");
            break;
        }
        let words: Vec<&str> = s.split_whitespace().collect();
        if words.is_empty() {
            println!("No words were input. Try again");
            continue;
        }

        let oov_words: Vec<&str> = words
            .iter()
            .filter(|&&w| word_vectors.get_index(w).is_none())
            .copied()
            .collect();
        if !oov_words.is_empty() {
            for word in &oov_words {
                println!("'{word}' is out of vocabulary");
            }
            continue;
        }

        const TOP_N: usize = 30;
        let Some(topn) = word_vectors.nearest_to_sum(&words, TOP_N) else {
            println!("No near words!");
            continue;
        };

        println!("\nNearest words to '{}':", words.join(" + "));
        println!("{:>4} {:>10} Word", "Rank", "Score");
        println!("{}", "-".repeat(30));
        for (i, (idx, score)) in topn.iter().enumerate() {
            println!("{:4}: {:10.6} {}", i + 1, score, word_vectors.get_word(*idx));
        }
    }

    Ok(())
}
