use clap::Parser;
use secvec_rs::WordVectors;
use std::io::{self, Write};
use std::path::PathBuf;

/// Interactive word analogies: KING is to QUEEN as MAN is to ?
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

    loop {
        println!("\nWord analogy - KING is to QUEEN as MAN is to ?");
        print!("Enter 3 words: ");
        io::stdout().flush()?;
        let s = get_input()?;
        if s == "EXIT" {
            break;
        }
        let words: Vec<&str> = s.split_whitespace().collect();
        if words.len() != 3 {
            println!("Expected exactly 3 words, but got {}. Try again.", words.len());
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

        let Some(topn) = word_vectors.analogy_topn(words[0], words[1], words[2], 30) else {
            println!("No analogies");
            continue;
        };
        for (i, (idx, score)) in topn.iter().enumerate() {
            println!("{:3}: {:>8.5} {}", i + 1, score, word_vectors.get_word(*idx));
        }
    }

    Ok(())
}
