//! Corpus tokenisation and the hash-chained vocabulary built from it.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Longest word kept, in bytes; longer words are truncated.
pub const MAX_WORD_LEN: usize = 100;
/// Longest line kept, in tokens; longer lines are split.
pub const MAX_LINE_LEN: usize = 1024;
/// Id returned for words that are not in the retained vocabulary.
pub const UNMAPPED: i64 = -1;

const TABLE_SIZE: u32 = 1_048_576;
const HASH_SEED: u32 = 1_159_241;
const NIL: u32 = u32::MAX;

/// Buffered byte reader with one byte of pushback and a consumed-byte
/// position, so training threads can carve the corpus into byte shards.
pub struct CorpusReader {
    reader: BufReader<File>,
    pushback: Option<u8>,
    pos: u64,
    size: u64,
    eof: bool,
}

impl CorpusReader {
    pub fn open(path: &Path) -> Result<CorpusReader> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let size = file.metadata()?.len();
        Ok(CorpusReader { reader: BufReader::new(file), pushback: None, pos: 0, size, eof: false })
    }

    pub fn file_size(&self) -> u64 {
        self.size
    }

    /// Bytes consumed so far; ungetting a byte rolls this back.
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn at_eof(&self) -> bool {
        self.eof
    }

    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Start(pos))?;
        self.pushback = None;
        self.eof = false;
        self.pos = pos;
        Ok(())
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.pushback.take() {
            self.pos += 1;
            return Ok(Some(b));
        }
        let b = {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                self.eof = true;
                return Ok(None);
            }
            buf[0]
        };
        self.reader.consume(1);
        self.pos += 1;
        Ok(Some(b))
    }

    fn unget(&mut self, b: u8) {
        self.pushback = Some(b);
        self.pos -= 1;
    }

    /// Next token, or `None` at a line boundary or end of file.
    ///
    /// Words are lowercased byte-wise and split on whitespace; ASCII
    /// punctuation ends the current word and comes back as its own
    /// single-byte token. A newline ending a word is pushed back so the
    /// following call reports the line boundary.
    pub fn read_word(&mut self) -> Result<Option<String>> {
        let mut word: Vec<u8> = Vec::new();
        loop {
            let Some(b) = self.next_byte()? else {
                return Ok(if word.is_empty() { None } else { Some(finish_word(word)) });
            };
            match b {
                b'\r' => {}
                b' ' | b'\t' => {
                    if !word.is_empty() {
                        return Ok(Some(finish_word(word)));
                    }
                }
                b'\n' => {
                    if word.is_empty() {
                        return Ok(None);
                    }
                    self.unget(b'\n');
                    return Ok(Some(finish_word(word)));
                }
                0 | 0x0b | 0x0c => {
                    return Ok(if word.is_empty() { None } else { Some(finish_word(word)) });
                }
                _ if word.len() < MAX_WORD_LEN => {
                    if b.is_ascii_punctuation() {
                        if word.is_empty() {
                            word.push(b);
                        } else {
                            self.unget(b);
                        }
                        return Ok(Some(finish_word(word)));
                    }
                    word.push(b.to_ascii_lowercase());
                }
                // over the cap: swallow bytes until a separator
                _ => {}
            }
        }
    }
}

fn finish_word(mut bytes: Vec<u8>) -> String {
    if bytes.len() == MAX_WORD_LEN {
        trim_partial_utf8(&mut bytes);
    }
    match String::from_utf8(bytes) {
        Ok(word) => word,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Drops a multi-byte sequence the length cap cut in half.
fn trim_partial_utf8(bytes: &mut Vec<u8>) {
    let mut i = bytes.len();
    while i > 0 && bytes[i - 1] & 0b1100_0000 == 0b1000_0000 {
        i -= 1;
    }
    if i == 0 {
        return;
    }
    let lead = bytes[i - 1];
    let need = if lead & 0b1110_0000 == 0b1100_0000 {
        2
    } else if lead & 0b1111_0000 == 0b1110_0000 {
        3
    } else if lead & 0b1111_1000 == 0b1111_0000 {
        4
    } else {
        return;
    };
    if bytes.len() - (i - 1) < need {
        bytes.truncate(i - 1);
    }
}

/// Bytes above 0x7f contribute their sign-extended value, like a signed
/// `char` widened to int.
fn hash_word(word: &str) -> u32 {
    let mut h = HASH_SEED;
    for &b in word.as_bytes() {
        let c = b as i8 as i32 as u32;
        h ^= (h << 5).wrapping_add(c).wrapping_add(h >> 2);
    }
    (h & 0x7fff_ffff) % TABLE_SIZE
}

#[derive(Debug)]
struct Node {
    word: Option<Box<str>>,
    count: u64,
    id: i64,
    next: u32,
}

/// Vocabulary with open hashing into an arena of nodes.
///
/// After `build`, retained words carry dense ids `0..len()` ordered by
/// descending count (ties broken lexically); everything else maps to
/// [`UNMAPPED`].
#[derive(Debug)]
pub struct Dictionary {
    buckets: Vec<u32>,
    nodes: Vec<Node>,
    vocab: Vec<u32>,
    total_tokens: u64,
}

impl Dictionary {
    /// Reads the whole corpus once, counting words, then prunes to the
    /// retained vocabulary.
    pub fn build(path: &Path, min_count: u64, max_vocab: usize, verbose: i32) -> Result<Dictionary> {
        let mut dict = Dictionary {
            buckets: vec![NIL; TABLE_SIZE as usize],
            nodes: Vec::new(),
            vocab: Vec::new(),
            total_tokens: 0,
        };
        let mut reader = CorpusReader::open(path)?;
        while !reader.at_eof() {
            if let Some(word) = reader.read_word()? {
                dict.insert(&word);
                dict.total_tokens += 1;
                if verbose > 1 && dict.total_tokens % 1_000_000 == 0 {
                    eprint!("\rRead {}M tokens", dict.total_tokens / 1_000_000);
                }
            }
        }
        dict.prune(min_count, max_vocab)?;
        if verbose > 0 {
            eprintln!("\rRead {} tokens, kept {} words", dict.total_tokens, dict.len());
        }
        Ok(dict)
    }

    fn insert(&mut self, word: &str) {
        let bucket = hash_word(word) as usize;
        let mut at = self.buckets[bucket];
        while at != NIL {
            let node = &mut self.nodes[at as usize];
            if node.word.as_deref() == Some(word) {
                node.count += 1;
                return;
            }
            at = node.next;
        }
        let idx = self.nodes.len() as u32;
        self.nodes.push(Node {
            word: Some(word.into()),
            count: 1,
            id: UNMAPPED,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = idx;
    }

    fn prune(&mut self, min_count: u64, max_vocab: usize) -> Result<()> {
        let mut handles: Vec<u32> = (0..self.nodes.len() as u32)
            .filter(|&h| self.nodes[h as usize].count >= min_count)
            .collect();
        handles.sort_by(|&a, &b| {
            let (na, nb) = (&self.nodes[a as usize], &self.nodes[b as usize]);
            nb.count.cmp(&na.count).then_with(|| na.word.cmp(&nb.word))
        });
        handles.truncate(max_vocab);
        if handles.is_empty() {
            bail!("empty vocabulary after pruning (min count {min_count})");
        }
        for (id, &h) in handles.iter().enumerate() {
            self.nodes[h as usize].id = id as i64;
        }
        // release what didn't make the cut; the nodes stay in their
        // chains but can no longer match a lookup
        for node in &mut self.nodes {
            if node.id == UNMAPPED {
                node.word = None;
                node.count = 0;
            }
        }
        self.vocab = handles;
        Ok(())
    }

    /// Dense id of `word`, or [`UNMAPPED`].
    pub fn lookup(&self, word: &str) -> i64 {
        let mut at = self.buckets[hash_word(word) as usize];
        while at != NIL {
            let node = &self.nodes[at as usize];
            if node.word.as_deref() == Some(word) {
                return node.id;
            }
            at = node.next;
        }
        UNMAPPED
    }

    pub fn word(&self, id: usize) -> &str {
        self.nodes[self.vocab[id] as usize].word.as_deref().unwrap_or_default()
    }

    pub fn count(&self, id: usize) -> u64 {
        self.nodes[self.vocab[id] as usize].count
    }

    /// Counts of the retained words, indexed by dense id.
    pub fn counts(&self) -> Vec<u64> {
        self.vocab.iter().map(|&h| self.nodes[h as usize].count).collect()
    }

    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// Tokens seen at build time, pruned words included.
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Fills `line` with the ids of the next line's tokens, [`UNMAPPED`]
    /// holes included. Lines longer than [`MAX_LINE_LEN`] continue in the
    /// next call.
    pub fn read_line(&self, reader: &mut CorpusReader, line: &mut Vec<i64>) -> Result<()> {
        line.clear();
        while line.len() < MAX_LINE_LEN {
            match reader.read_word()? {
                Some(word) => line.push(self.lookup(&word)),
                None => break,
            }
        }
        Ok(())
    }

    /// Writes `word count` lines in id order.
    pub fn save_vocab(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for id in 0..self.len() {
            writeln!(out, "{} {}", self.word(id), self.count(id))?;
        }
        Ok(())
    }
}
