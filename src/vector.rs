//! Dense vector primitives over plain `f64` slices.
//!
//! Rows of the embedding matrices are flat slices, so the algebra lives in
//! free functions rather than a vector type.

/// Dot product of two equal-length slices.
pub fn dot(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    xs.iter().zip(ys).map(|(x, y)| x * y).sum()
}

/// Euclidean (L2) norm.
pub fn norm(xs: &[f64]) -> f64 {
    xs.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// `xs += a * ys`, element-wise.
pub fn add_scaled(xs: &mut [f64], ys: &[f64], a: f64) {
    debug_assert_eq!(xs.len(), ys.len());
    for (x, y) in xs.iter_mut().zip(ys) {
        *x += a * y;
    }
}

/// `xs *= a`, element-wise.
pub fn scale(xs: &mut [f64], a: f64) {
    for x in xs.iter_mut() {
        *x *= a;
    }
}

/// Rescales `xs` to unit L2 norm.
pub fn normalize(xs: &mut [f64]) {
    let n = norm(xs);
    scale(xs, 1.0 / n);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn l2_norm() {
        assert_eq!(norm(&[3.0, 4.0]), 5.0);
        assert_eq!(norm(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn scaled_add() {
        let mut xs = [1.0, 2.0];
        add_scaled(&mut xs, &[10.0, 20.0], 0.5);
        assert_eq!(xs, [6.0, 12.0]);
    }

    #[test]
    fn scaling() {
        let mut xs = [1.0, -2.0, 4.0];
        scale(&mut xs, -2.0);
        assert_eq!(xs, [-2.0, 4.0, -8.0]);
    }

    #[test]
    fn normalizing() {
        let mut xs = [3.0, 4.0];
        normalize(&mut xs);
        assert!((norm(&xs) - 1.0).abs() < 1e-12);
        assert!((xs[0] - 0.6).abs() < 1e-12);
    }
}
