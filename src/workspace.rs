//! Per-thread scratch state for the training loop.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Everything one worker thread mutates while training, owned by that
/// thread alone. The buffers are allocated once and reused per token so
/// the hot loop never touches the allocator.
pub struct GradientWorkspace {
    /// Dense id of the token currently being trained.
    pub in_id: i64,
    /// Unit-normalized copy of the token's input row.
    pub input: Vec<f64>,
    /// Input-gradient accumulator, summed over the token's window.
    pub grad: Vec<f64>,
    /// Copy of the current output row.
    pub out: Vec<f64>,
    /// Copy of the second output row of the pair-sum term.
    pub sec_out: Vec<f64>,
    /// `out + sec_out`, rebuilt per pair-sum evaluation.
    pub sum: Vec<f64>,
    /// This thread's private negative-sampling stream.
    pub rng: StdRng,
    pub loss_first: f64,
    pub loss_second: f64,
    /// Tokens this thread has trained on, the loss-average denominator.
    pub examples: u64,
    pub lr: f64,
}

impl GradientWorkspace {
    pub fn new(dim: usize, seed: u64) -> GradientWorkspace {
        GradientWorkspace {
            in_id: 0,
            input: vec![0.0; dim],
            grad: vec![0.0; dim],
            out: vec![0.0; dim],
            sec_out: vec![0.0; dim],
            sum: vec![0.0; dim],
            rng: StdRng::seed_from_u64(seed),
            loss_first: 0.0,
            loss_second: 0.0,
            examples: 0,
            lr: 0.0,
        }
    }

    /// Called once per processed line with the annealed rate.
    pub fn set_lr(&mut self, lr: f64) {
        self.lr = lr;
    }

    pub fn avg_loss_first(&self) -> f64 {
        if self.examples == 0 { 0.0 } else { self.loss_first / self.examples as f64 }
    }

    pub fn avg_loss_second(&self) -> f64 {
        if self.examples == 0 { 0.0 } else { self.loss_second / self.examples as f64 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_workspace_is_zeroed() {
        let ws = GradientWorkspace::new(8, 3);
        assert_eq!(ws.input, vec![0.0; 8]);
        assert_eq!(ws.grad, vec![0.0; 8]);
        assert_eq!(ws.examples, 0);
        assert_eq!(ws.lr, 0.0);
    }

    #[test]
    fn loss_averages_guard_zero_examples() {
        let mut ws = GradientWorkspace::new(4, 0);
        assert_eq!(ws.avg_loss_first(), 0.0);
        assert_eq!(ws.avg_loss_second(), 0.0);
        ws.loss_first = 3.0;
        ws.loss_second = 1.0;
        ws.examples = 2;
        assert_eq!(ws.avg_loss_first(), 1.5);
        assert_eq!(ws.avg_loss_second(), 0.5);
    }

    #[test]
    fn lr_is_settable() {
        let mut ws = GradientWorkspace::new(4, 0);
        ws.set_lr(0.05);
        assert_eq!(ws.lr, 0.05);
    }
}
