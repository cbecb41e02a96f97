//! Second-order skip-gram word embeddings on the unit hypersphere.
//!
//! The pipeline: [`Dictionary::build`] counts and prunes the vocabulary,
//! [`Trainer::new`] seeds the embedding matrices and the negative-sampling
//! table, [`Trainer::train`] runs Hogwild-style workers over byte shards
//! of the corpus, and [`Trainer::save_vectors`] writes the result.
//! [`WordVectors`] loads trained files back for similarity queries.

pub mod dictionary;
pub mod loss;
pub mod matrix;
pub mod trainer;
pub mod vector;
pub mod word_vectors;
pub mod workspace;

pub use dictionary::{CorpusReader, Dictionary, UNMAPPED};
pub use loss::{ApproxMath, NegativeSampler, Objective};
pub use matrix::Matrix;
pub use trainer::{TrainConfig, TrainStats, Trainer};
pub use word_vectors::WordVectors;
pub use workspace::GradientWorkspace;
