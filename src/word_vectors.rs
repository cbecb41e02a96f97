//! Loading trained vectors and querying them by cosine similarity.

use anyhow::{Context, Result, bail};
use byteorder::{LittleEndian, ReadBytesExt};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Trained word vectors in one contiguous array, unit-normalized at load
/// time so a dot product is a cosine similarity.
#[derive(Debug)]
pub struct WordVectors {
    words: Vec<String>,
    word_map: HashMap<String, usize>,
    vectors: Vec<f64>,
    dims: usize,
}

impl WordVectors {
    /// Loads a `.vec`/`.output` file; a `.bin` extension selects the
    /// binary layout, anything else the text one.
    pub fn from_file(path: &Path) -> Result<WordVectors> {
        if path.extension().is_some_and(|e| e == "bin") {
            WordVectors::from_binary(path)
        } else {
            WordVectors::from_text(path)
        }
    }

    /// Text form: a `<vocab> <dim>` header line, then one
    /// `word c0 .. c{dim-1}` line per word.
    pub fn from_text(path: &Path) -> Result<WordVectors> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut lines = BufReader::new(file).lines();
        let header = lines.next().context("missing header line")??;
        let (vocab, dims) = parse_header(&header)?;

        let mut loader = Loader::new(vocab, dims);
        for line in lines {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };
            let values = parts
                .map(|s| s.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .with_context(|| format!("bad component for '{word}'"))?;
            loader.push(word.to_string(), values)?;
        }
        loader.finish()
    }

    /// Binary form as written by the trainer: little-endian `u64 vocab,
    /// u64 dim`, then per word a `u32` length, the word bytes, and the
    /// row as raw f64s.
    pub fn from_binary(path: &Path) -> Result<WordVectors> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let vocab = reader.read_u64::<LittleEndian>()? as usize;
        let dims = reader.read_u64::<LittleEndian>()? as usize;
        if dims == 0 {
            bail!("zero dimensions in {}", path.display());
        }

        let mut loader = Loader::new(vocab, dims);
        let mut row_bytes = vec![0u8; dims * size_of::<f64>()];
        for _ in 0..vocab {
            let len = reader.read_u32::<LittleEndian>()? as usize;
            let mut word_bytes = vec![0u8; len];
            reader.read_exact(&mut word_bytes)?;
            let word = String::from_utf8(word_bytes).context("non-UTF-8 word in binary file")?;
            reader.read_exact(&mut row_bytes)?;
            // copies through bytemuck, so the byte buffer's alignment is fine
            loader.push(word, bytemuck::pod_collect_to_vec::<u8, f64>(&row_bytes))?;
        }
        loader.finish()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn get_word(&self, idx: usize) -> &str {
        &self.words[idx]
    }

    pub fn get_index(&self, word: &str) -> Option<usize> {
        self.word_map.get(word).copied()
    }

    fn get_vector(&self, idx: usize) -> &[f64] {
        &self.vectors[idx * self.dims..(idx + 1) * self.dims]
    }

    /// Top `n` words nearest to the normalized sum of `words`, input
    /// words excluded. `None` when every input word is out of vocabulary.
    pub fn nearest_to_sum(&self, words: &[&str], n: usize) -> Option<Vec<(usize, f64)>> {
        let indices: Vec<usize> = words.iter().filter_map(|w| self.get_index(w)).collect();
        if indices.is_empty() {
            return None;
        }
        let input_indices: HashSet<usize> = indices.iter().copied().collect();

        let mut target = vec![0.0; self.dims];
        for &idx in &indices {
            for (t, v) in target.iter_mut().zip(self.get_vector(idx)) {
                *t += v;
            }
        }
        let magnitude = target.iter().map(|x| x * x).sum::<f64>().sqrt();
        if magnitude == 0.0 {
            return None;
        }
        for t in target.iter_mut() {
            *t /= magnitude;
        }

        Some(self.ranked(&target, |i| !input_indices.contains(&i), n))
    }

    /// `a` is to `b` as `c` is to? Top `n` by dot product against
    /// `b − a + c`, the three inputs excluded.
    pub fn analogy_topn(&self, a: &str, b: &str, c: &str, n: usize) -> Option<Vec<(usize, f64)>> {
        let (a_idx, b_idx, c_idx) = (self.get_index(a)?, self.get_index(b)?, self.get_index(c)?);
        let (va, vb, vc) = (self.get_vector(a_idx), self.get_vector(b_idx), self.get_vector(c_idx));
        let target: Vec<f64> = (0..self.dims).map(|i| vb[i] - va[i] + vc[i]).collect();
        Some(self.ranked(&target, |i| i != a_idx && i != b_idx && i != c_idx, n))
    }

    /// Parallel scan over all vectors, keeping the `n` best dot products
    /// among indices passing `keep`.
    fn ranked<F>(&self, target: &[f64], keep: F, n: usize) -> Vec<(usize, f64)>
    where
        F: Fn(usize) -> bool + Sync,
    {
        let mut scores: Vec<(usize, f64)> = self
            .vectors
            .par_chunks_exact(self.dims)
            .enumerate()
            .filter(|(i, _)| keep(*i))
            .map(|(i, row)| {
                let score = row.iter().zip(target).map(|(v, t)| v * t).sum::<f64>();
                (i, score)
            })
            .collect();
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores.truncate(n);
        scores
    }
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let vocab: usize = parts.next().context("header missing vocab size")?.parse()?;
    let dims: usize = parts.next().context("header missing dimension")?.parse()?;
    if dims == 0 {
        bail!("zero dimensions in header");
    }
    Ok((vocab, dims))
}

/// Shared tail of the two loaders: dimension check, unit normalization,
/// vocab-count check.
struct Loader {
    expect: usize,
    dims: usize,
    words: Vec<String>,
    word_map: HashMap<String, usize>,
    vectors: Vec<f64>,
}

impl Loader {
    fn new(expect: usize, dims: usize) -> Loader {
        Loader {
            expect,
            dims,
            words: Vec::with_capacity(expect),
            word_map: HashMap::with_capacity(expect),
            vectors: Vec::with_capacity(expect * dims),
        }
    }

    fn push(&mut self, word: String, mut values: Vec<f64>) -> Result<()> {
        const EPS: f64 = 1e-8;
        if values.len() != self.dims {
            bail!("vector for '{word}' has dimension {}, expected {}", values.len(), self.dims);
        }
        let norm = values.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > EPS {
            values.iter_mut().for_each(|v| *v /= norm);
        }
        self.word_map.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.extend_from_slice(&values);
        Ok(())
    }

    fn finish(self) -> Result<WordVectors> {
        if self.words.is_empty() {
            bail!("no word vectors found");
        }
        if self.words.len() != self.expect {
            bail!("header promised {} words, found {}", self.expect, self.words.len());
        }
        Ok(WordVectors {
            words: self.words,
            word_map: self.word_map,
            vectors: self.vectors,
            dims: self.dims,
        })
    }
}
