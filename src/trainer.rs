//! Multithreaded training coordinator.
//!
//! Workers train Hogwild-style against the shared input/output matrices:
//! each thread owns a contiguous byte shard of the corpus, reseeks to it
//! every epoch, and runs forward/backward plus a Riemannian retraction per
//! token. The only cross-thread traffic is the relaxed atomics in
//! [`Progress`]; the matrices themselves race by design.

use crate::dictionary::{CorpusReader, Dictionary, UNMAPPED};
use crate::loss::{ApproxMath, NegativeSampler, Objective};
use crate::matrix::Matrix;
use crate::vector;
use crate::workspace::GradientWorkspace;
use anyhow::{Context, Result, bail};
use byteorder::{LittleEndian, WriteBytesExt};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant, SystemTime};

/// Everything the trainer needs from the caller.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub corpus: PathBuf,
    /// Output path prefix; `.vec` / `.output` (and `.bin` twins) are appended.
    pub save_prefix: PathBuf,
    pub dim: usize,
    pub window: usize,
    pub epochs: usize,
    pub neg: usize,
    pub lr: f64,
    pub threads: usize,
    pub objective: Objective,
    /// 0: text, 1: binary, 2: both.
    pub binary: i32,
    /// 0 derives a seed from the clock.
    pub seed: u64,
    pub verbose: i32,
}

/// Process-wide training counters, all relaxed atomics.
struct Progress {
    /// Tokens consumed so far, summed over every thread.
    tokens: AtomicU64,
    /// Average losses of thread 0's workspace, f64 bit patterns.
    loss_first: AtomicU64,
    loss_second: AtomicU64,
    /// Set by any worker that sees a non-finite row norm.
    fatal: AtomicBool,
    /// Workers still running; the monitor polls until this hits zero.
    alive: AtomicUsize,
}

impl Progress {
    fn new(threads: usize) -> Progress {
        Progress {
            tokens: AtomicU64::new(0),
            loss_first: AtomicU64::new(0.0_f64.to_bits()),
            loss_second: AtomicU64::new(0.0_f64.to_bits()),
            fatal: AtomicBool::new(false),
            alive: AtomicUsize::new(threads),
        }
    }

    fn store_losses(&self, first: f64, second: f64) {
        self.loss_first.store(first.to_bits(), Ordering::Relaxed);
        self.loss_second.store(second.to_bits(), Ordering::Relaxed);
    }

    fn losses(&self) -> (f64, f64) {
        (
            f64::from_bits(self.loss_first.load(Ordering::Relaxed)),
            f64::from_bits(self.loss_second.load(Ordering::Relaxed)),
        )
    }
}

/// What `train` reports back once all workers have joined.
#[derive(Debug, Clone, Copy)]
pub struct TrainStats {
    /// Tokens consumed across all threads and epochs.
    pub tokens: u64,
}

/// Learning rate after a line at `shard_frac` of the shard in `epoch`,
/// annealing linearly from `initial` to zero over the whole run.
fn annealed_lr(initial: f64, shard_frac: f64, epoch: usize, epochs: usize) -> f64 {
    let overall = shard_frac / epochs as f64 + epoch as f64 / epochs as f64;
    (1.0 - overall) * initial
}

/// Second context id for the pair-sum term.
///
/// The RNG is seeded from the context token's id value, so the draw
/// sequence is a function of the word, not of the thread's stream.
/// Offset 0 always lands on the mapped center token, so the loop
/// terminates whenever the primary offset is nonzero, which it is.
fn pick_sec_out_id(window: i64, out_id: i64, line_index: usize, shift: i64, line: &[i64]) -> i64 {
    let mut rng = StdRng::seed_from_u64(out_id as u64);
    loop {
        let sec_shift = rng.random_range(-window..=window);
        let pos = line_index as i64 + sec_shift;
        if pos >= 0
            && (pos as usize) < line.len()
            && sec_shift != shift
            && line[pos as usize] != UNMAPPED
        {
            return line[pos as usize];
        }
    }
}

/// Owns the embedding matrices and runs the training epochs.
pub struct Trainer<'a> {
    dict: &'a Dictionary,
    cfg: &'a TrainConfig,
    input: Matrix,
    output: Matrix,
    math: ApproxMath,
    sampler: NegativeSampler,
    seed: u64,
}

impl<'a> Trainer<'a> {
    /// Initializes both matrices uniformly in ±0.05 and builds the
    /// sampling tables. Input rows start on the unit sphere so the
    /// manifold invariant holds before the first update.
    pub fn new(dict: &'a Dictionary, cfg: &'a TrainConfig) -> Trainer<'a> {
        let seed = if cfg.seed == 0 {
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(1)
        } else {
            cfg.seed
        };
        if cfg.verbose > 0 {
            eprintln!("Using random seed {seed}");
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let input = Matrix::uniform(dict.len(), cfg.dim, 0.05, &mut rng);
        input.normalize_rows();
        let output = Matrix::uniform(dict.len(), cfg.dim, 0.05, &mut rng);
        let sampler = NegativeSampler::new(&dict.counts(), cfg.objective.sampling_power());
        Trainer { dict, cfg, input, output, math: ApproxMath::new(), sampler, seed }
    }

    /// Runs all epochs across all threads; blocks until done.
    pub fn train(&self) -> Result<TrainStats> {
        let progress = Progress::new(self.cfg.threads);
        let total = self.dict.total_tokens() * self.cfg.epochs as u64;
        let start = Instant::now();

        std::thread::scope(|s| -> Result<()> {
            let progress = &progress;
            let handles = (0..self.cfg.threads)
                .map(|id| s.spawn(move || self.worker(id, progress)))
                .collect::<Vec<_>>();

            while progress.alive.load(Ordering::Relaxed) > 0 {
                std::thread::sleep(Duration::from_millis(100));
                if self.cfg.verbose > 1 {
                    let done = progress.tokens.load(Ordering::Relaxed);
                    print_progress(done as f64 / total as f64, done, progress, start);
                }
            }

            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(result) => result.with_context(|| format!("worker thread {id}"))?,
                    Err(_) => bail!("worker thread {id} panicked"),
                }
            }
            Ok(())
        })?;

        if progress.fatal.load(Ordering::Relaxed) {
            bail!("training diverged: a row norm became non-finite");
        }
        let tokens = progress.tokens.load(Ordering::Relaxed);
        if self.cfg.verbose > 1 {
            print_progress(1.0, tokens, &progress, start);
            eprintln!();
        }
        Ok(TrainStats { tokens })
    }

    /// One worker: seek to the byte shard, loop epochs over its lines.
    /// Decrements `alive` on every exit path so the monitor terminates.
    fn worker(&self, thread_id: usize, progress: &Progress) -> Result<()> {
        let result = self.worker_loop(thread_id, progress);
        progress.alive.fetch_sub(1, Ordering::Relaxed);
        result
    }

    fn worker_loop(&self, thread_id: usize, progress: &Progress) -> Result<()> {
        let mut reader = CorpusReader::open(&self.cfg.corpus)?;
        let threads = self.cfg.threads as u64;
        let begin = thread_id as u64 * reader.file_size() / threads;
        let end = (thread_id as u64 + 1) * reader.file_size() / threads;
        let span = (end - begin).max(1) as f64;

        let mut ws = GradientWorkspace::new(self.cfg.dim, self.seed.wrapping_add(thread_id as u64));
        ws.set_lr(self.cfg.lr);
        let mut line: Vec<i64> = Vec::new();

        'epochs: for epoch in 0..self.cfg.epochs {
            reader.seek(begin)?;
            // an in-progress line may run past `end`, a new one never starts there
            while reader.position() < end && !reader.at_eof() {
                if progress.fatal.load(Ordering::Relaxed) {
                    break 'epochs;
                }
                self.dict.read_line(&mut reader, &mut line)?;
                if line.is_empty() {
                    continue;
                }
                self.train_line(thread_id, &line, &mut ws, progress);
                let shard_frac = (reader.position().min(end) - begin) as f64 / span;
                ws.set_lr(annealed_lr(self.cfg.lr, shard_frac, epoch, self.cfg.epochs));
            }
        }
        Ok(())
    }

    /// Forward/backward over every token of one line.
    fn train_line(
        &self,
        thread_id: usize,
        line: &[i64],
        ws: &mut GradientWorkspace,
        progress: &Progress,
    ) {
        let window = self.cfg.window as i64;
        for (line_index, &in_id) in line.iter().enumerate() {
            if in_id != UNMAPPED {
                ws.in_id = in_id;
                self.input.copy_row_into(in_id as usize, &mut ws.input);
                vector::normalize(&mut ws.input);
                ws.grad.fill(0.0);
                let mut touched = false;
                for shift in -window..=window {
                    if shift == 0 {
                        continue;
                    }
                    let pos = line_index as i64 + shift;
                    if pos < 0 || pos as usize >= line.len() {
                        continue;
                    }
                    let out_id = line[pos as usize];
                    if out_id == UNMAPPED {
                        continue;
                    }
                    touched = true;
                    match self.cfg.objective {
                        Objective::SecondOrder => {
                            let sec_out_id =
                                pick_sec_out_id(window, out_id, line_index, shift, line);
                            self.forward_pair(out_id, sec_out_id, ws);
                        }
                        Objective::SkipGram => self.forward_single(out_id, ws),
                    }
                }
                if touched {
                    self.riemannian_update(ws, progress);
                }
            }
            if thread_id == 0 {
                progress.store_losses(ws.avg_loss_first(), ws.avg_loss_second());
            }
        }
        progress.tokens.fetch_add(line.len() as u64, Ordering::Relaxed);
    }

    /// Second-order objective: single-pair and pair-sum positives, `neg`
    /// single negatives, `(neg mod 2)²` negative pairs. The pair count
    /// collapses to zero for even `neg`; that is the shipped behavior.
    fn forward_pair(&self, out_id: i64, sec_out_id: i64, ws: &mut GradientWorkspace) {
        let mut loss_first = 0.0;
        let mut loss_second = 0.0;
        self.output.copy_row_into(out_id as usize, &mut ws.out);
        self.output.copy_row_into(sec_out_id as usize, &mut ws.sec_out);
        self.logistic_single(out_id, ws, true, &mut loss_first);
        self.logistic_pair(out_id, sec_out_id, ws, true, &mut loss_second);
        for _ in 0..self.cfg.neg {
            let neg_id = self.sampler.draw(out_id, &mut ws.rng);
            self.output.copy_row_into(neg_id as usize, &mut ws.out);
            self.logistic_single(neg_id, ws, false, &mut loss_first);
        }
        let pairs = self.cfg.neg % 2;
        for _ in 0..pairs {
            for _ in 0..pairs {
                let neg_id = self.sampler.draw(out_id, &mut ws.rng);
                let sec_neg_id = self.sampler.draw(sec_out_id, &mut ws.rng);
                self.output.copy_row_into(neg_id as usize, &mut ws.out);
                self.output.copy_row_into(sec_neg_id as usize, &mut ws.sec_out);
                self.logistic_pair(neg_id, sec_neg_id, ws, false, &mut loss_second);
            }
        }
        ws.loss_first += loss_first;
        ws.loss_second += loss_second;
        ws.examples += 1;
    }

    /// Plain skip-gram objective: one positive, `neg` negatives, no
    /// second loss channel.
    fn forward_single(&self, out_id: i64, ws: &mut GradientWorkspace) {
        let mut loss_first = 0.0;
        self.output.copy_row_into(out_id as usize, &mut ws.out);
        self.logistic_single(out_id, ws, true, &mut loss_first);
        for _ in 0..self.cfg.neg {
            let neg_id = self.sampler.draw(out_id, &mut ws.rng);
            self.output.copy_row_into(neg_id as usize, &mut ws.out);
            self.logistic_single(neg_id, ws, false, &mut loss_first);
        }
        ws.loss_first += loss_first;
        ws.examples += 1;
    }

    /// One logistic term on `unit_input · out_row`: push the output row
    /// toward/away from the input, accumulate the input gradient locally.
    fn logistic_single(&self, out_id: i64, ws: &mut GradientWorkspace, positive: bool, loss: &mut f64) {
        let score = self.math.sigmoid(vector::dot(&ws.input, &ws.out));
        let alpha = f64::from(positive) - score;
        self.output.add_to_row(out_id as usize, &ws.input, ws.lr * alpha);
        vector::add_scaled(&mut ws.grad, &ws.out, -alpha);
        *loss += if positive { -self.math.log(score) } else { -self.math.log(1.0 - score) };
    }

    /// The pair-sum term: scores against `out_row + sec_out_row` and
    /// backpropagates through both output rows.
    fn logistic_pair(
        &self,
        out_id: i64,
        sec_out_id: i64,
        ws: &mut GradientWorkspace,
        positive: bool,
        loss: &mut f64,
    ) {
        ws.sum.fill(0.0);
        vector::add_scaled(&mut ws.sum, &ws.out, 1.0);
        vector::add_scaled(&mut ws.sum, &ws.sec_out, 1.0);
        let score = self.math.sigmoid(vector::dot(&ws.input, &ws.sum));
        let alpha = f64::from(positive) - score;
        self.output.add_to_row(out_id as usize, &ws.input, ws.lr * alpha);
        self.output.add_to_row(sec_out_id as usize, &ws.input, ws.lr * alpha);
        vector::add_scaled(&mut ws.grad, &ws.sum, -alpha);
        *loss += if positive { -self.math.log(score) } else { -self.math.log(1.0 - score) };
    }

    /// Riemannian step on the token's shared input row:
    /// project the gradient onto the tangent space at the unit input,
    /// step against it, and retract back onto the sphere by renormalizing.
    fn riemannian_update(&self, ws: &mut GradientWorkspace, progress: &Progress) {
        let row = ws.in_id as usize;
        let grad_norm = vector::norm(&ws.grad);
        if grad_norm > 0.0 {
            let project_scale = vector::dot(&ws.input, &ws.grad);
            ws.sum.fill(0.0);
            vector::add_scaled(&mut ws.sum, &ws.grad, 1.0);
            vector::add_scaled(&mut ws.sum, &ws.input, -project_scale);
            vector::scale(&mut ws.sum, -ws.lr * (1.0 + project_scale / grad_norm));
            self.input.add_to_row(row, &ws.sum, 1.0);
        }
        let norm = self.input.l2_norm_row(row);
        if !norm.is_finite() || norm == 0.0 {
            progress.fatal.store(true, Ordering::Relaxed);
            return;
        }
        self.input.scale_row(row, 1.0 / norm);
    }

    /// Writes the vector files named by the configured prefix: `.vec`
    /// for the input matrix, `.output` for the output matrix, plus
    /// `.bin` twins when binary output is requested.
    pub fn save_vectors(&self) -> Result<()> {
        let prefix = self.cfg.save_prefix.display();
        if self.cfg.binary != 1 {
            self.save_text(&PathBuf::from(format!("{prefix}.vec")), &self.input)?;
            self.save_text(&PathBuf::from(format!("{prefix}.output")), &self.output)?;
        }
        if self.cfg.binary > 0 {
            self.save_binary(&PathBuf::from(format!("{prefix}.vec.bin")), &self.input)?;
            self.save_binary(&PathBuf::from(format!("{prefix}.output.bin")), &self.output)?;
        }
        Ok(())
    }

    fn save_text(&self, path: &Path, matrix: &Matrix) -> Result<()> {
        if self.cfg.verbose > 0 {
            eprintln!("Saving vectors to {}", path.display());
        }
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{} {}", matrix.rows(), matrix.cols())?;
        let mut row = vec![0.0; matrix.cols()];
        for id in 0..matrix.rows() {
            matrix.copy_row_into(id, &mut row);
            write!(out, "{}", self.dict.word(id))?;
            for v in &row {
                write!(out, " {v}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Little-endian records: `u64 vocab, u64 dim`, then per word a `u32`
    /// byte length, the word bytes, and the row as raw f64s.
    fn save_binary(&self, path: &Path, matrix: &Matrix) -> Result<()> {
        if self.cfg.verbose > 0 {
            eprintln!("Saving vectors to {}", path.display());
        }
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        out.write_u64::<LittleEndian>(matrix.rows() as u64)?;
        out.write_u64::<LittleEndian>(matrix.cols() as u64)?;
        let mut row = vec![0.0; matrix.cols()];
        for id in 0..matrix.rows() {
            matrix.copy_row_into(id, &mut row);
            let word = self.dict.word(id);
            out.write_u32::<LittleEndian>(word.len() as u32)?;
            out.write_all(word.as_bytes())?;
            out.write_all(bytemuck::cast_slice(&row))?;
        }
        Ok(())
    }
}

fn print_progress(ratio: f64, tokens: u64, progress: &Progress, start: Instant) {
    let (loss_first, loss_second) = progress.losses();
    let pct = (ratio * 100.0).min(100.0);
    let elapsed = start.elapsed().as_secs_f64();
    let wst = tokens as f64 / elapsed.max(1e-9);
    // a month until the first counter tick gives a usable rate
    let eta = if pct > 0.0 { (elapsed * (100.0 - pct) / pct) as i64 } else { 2_592_000 };
    eprint!(
        "\rProgress: {pct:5.1}% lossFirst: {loss_first:8.5} lossSecond: {loss_second:8.5} \
         words/sec: {wst:6.0} ETA: {}h{:02}m",
        eta / 3600,
        (eta % 3600) / 60
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn corpus(name: &str, text: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("secvec-train-{}-{name}", std::process::id()));
        std::fs::write(&path, text).unwrap();
        path
    }

    fn config(corpus: &std::path::Path, prefix: &std::path::Path) -> TrainConfig {
        TrainConfig {
            corpus: corpus.to_path_buf(),
            save_prefix: prefix.to_path_buf(),
            dim: 4,
            window: 1,
            epochs: 1,
            neg: 2,
            lr: 0.05,
            threads: 1,
            objective: Objective::SecondOrder,
            binary: 0,
            seed: 11,
            verbose: 0,
        }
    }

    #[test]
    fn lr_anneals_monotonically_to_zero() {
        let initial = 0.05;
        let mut last = initial;
        for epoch in 0..3 {
            for step in 0..=10 {
                let lr = annealed_lr(initial, step as f64 / 10.0, epoch, 3);
                assert!(lr <= last + 1e-12, "lr rose at epoch {epoch} step {step}");
                last = lr;
            }
        }
        assert!(annealed_lr(initial, 1.0, 2, 3).abs() < 1e-12);
        assert_eq!(annealed_lr(initial, 0.0, 0, 3), initial);
    }

    #[test]
    fn sec_out_id_is_deterministic_and_valid() {
        // ids: center 5 at index 2, window covers indices 0..=4
        let line = [7, UNMAPPED, 5, 9, 3];
        let first = pick_sec_out_id(2, 9, 2, 1, &line);
        let second = pick_sec_out_id(2, 9, 2, 1, &line);
        assert_eq!(first, second);
        // anything in the window except the primary offset and the hole
        assert!([7, 5, 3].contains(&first));
    }

    #[test]
    fn sec_out_id_can_return_the_center() {
        // only the center itself is a legal second pick
        let line = [UNMAPPED, 4, UNMAPPED];
        assert_eq!(pick_sec_out_id(1, 8, 1, 1, &line), 4);
    }

    #[test]
    fn scenario_small_corpus_end_to_end() {
        let path = corpus("a", b"a b c\na b d\n");
        let prefix = std::env::temp_dir().join(format!("secvec-train-out-{}", std::process::id()));
        let dict = Dictionary::build(&path, 1, 10, 0).unwrap();
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.count(dict.lookup("a") as usize), 2);
        assert_eq!(dict.count(dict.lookup("b") as usize), 2);
        assert_eq!(dict.count(dict.lookup("c") as usize), 1);

        let cfg = config(&path, &prefix);
        let trainer = Trainer::new(&dict, &cfg);
        let stats = trainer.train().unwrap();
        assert_eq!(stats.tokens, 6);
        trainer.save_vectors().unwrap();

        for suffix in [".vec", ".output"] {
            let file = PathBuf::from(format!("{}{suffix}", prefix.display()));
            let text = std::fs::read_to_string(&file).unwrap();
            assert_eq!(text.lines().next().unwrap(), "4 4");
            assert_eq!(text.lines().count(), 5);
            std::fs::remove_file(&file).unwrap();
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn input_rows_stay_on_the_unit_sphere() {
        let path = corpus("sphere", b"e f g h e f\ng h e f g h\ne g f h\n");
        let prefix = std::env::temp_dir().join("unused-prefix");
        let dict = Dictionary::build(&path, 1, 10, 0).unwrap();
        let mut cfg = config(&path, &prefix);
        cfg.epochs = 3;
        cfg.window = 2;
        let trainer = Trainer::new(&dict, &cfg);
        trainer.train().unwrap();
        for id in 0..dict.len() {
            assert!((trainer.input.l2_norm_row(id) - 1.0).abs() < 1e-9, "row {id} left the sphere");
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn skipgram_objective_trains_too() {
        let path = corpus("sg", b"p q r p q\nq r p q r\n");
        let prefix = std::env::temp_dir().join("unused-prefix");
        let dict = Dictionary::build(&path, 1, 10, 0).unwrap();
        let mut cfg = config(&path, &prefix);
        cfg.objective = Objective::SkipGram;
        let trainer = Trainer::new(&dict, &cfg);
        let stats = trainer.train().unwrap();
        assert_eq!(stats.tokens, 10);
        for id in 0..dict.len() {
            assert!((trainer.input.l2_norm_row(id) - 1.0).abs() < 1e-9);
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn sharding_consumes_the_same_tokens() {
        let mut text = Vec::new();
        for i in 0..40 {
            text.extend_from_slice(
                format!("w{} w{} w{} w{} w{}\n", i % 7, (i + 1) % 7, (i + 2) % 7, i % 5, i % 3)
                    .as_bytes(),
            );
        }
        let path = corpus("shards", &text);
        let prefix = std::env::temp_dir().join("unused-prefix");
        let dict = Dictionary::build(&path, 1, 100, 0).unwrap();

        let cfg1 = config(&path, &prefix);
        let one = Trainer::new(&dict, &cfg1).train().unwrap().tokens;

        let mut cfg4 = config(&path, &prefix);
        cfg4.threads = 4;
        let four = Trainer::new(&dict, &cfg4).train().unwrap().tokens;

        // shard boundaries round to whole lines; the longest line is 5 tokens
        let slack = (cfg4.threads * 5) as i64;
        assert!((one as i64 - four as i64).abs() <= slack, "one={one} four={four}");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn binary_dump_has_the_declared_layout() {
        use byteorder::ReadBytesExt;
        let path = corpus("bin", b"m n m n m\n");
        let prefix = std::env::temp_dir().join(format!("secvec-train-bin-{}", std::process::id()));
        let dict = Dictionary::build(&path, 1, 10, 0).unwrap();
        let mut cfg = config(&path, &prefix);
        cfg.binary = 1;
        let trainer = Trainer::new(&dict, &cfg);
        trainer.train().unwrap();
        trainer.save_vectors().unwrap();

        let file = PathBuf::from(format!("{}.vec.bin", prefix.display()));
        let mut reader = std::io::BufReader::new(File::open(&file).unwrap());
        assert_eq!(reader.read_u64::<LittleEndian>().unwrap(), 2);
        assert_eq!(reader.read_u64::<LittleEndian>().unwrap(), 4);
        let len = reader.read_u32::<LittleEndian>().unwrap();
        assert_eq!(len, 1);
        for f in [format!("{}.vec.bin", prefix.display()), format!("{}.output.bin", prefix.display())]
        {
            let _ = std::fs::remove_file(f);
        }
        std::fs::remove_file(&path).unwrap();
    }
}
