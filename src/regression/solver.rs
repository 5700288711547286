use crate::{Error, Matrix, Result, Vector};
use log::{debug, warn};

const TAU: f64 = 1e-12;

#[derive(Clone, Debug)]
pub(super) struct Solution {
    /// `alpha_i - alpha_i*` per training sample.
    pub coefficients: Vector,
    pub bias: f64,
    pub iterations: usize,
}

/// SMO on the epsilon-SVR dual written as a `2l`-variable problem: the first
/// `l` variables are `alpha` (sign `+1`), the last `l` are `alpha*` (sign `-1`).
pub(super) struct EpsilonSvr<'a> {
    kernel: &'a Matrix,
    targets: &'a Vector,
    c: f64,
    tube_epsilon: f64,
    tolerance: f64,
    max_iter: usize,
}

impl<'a> EpsilonSvr<'a> {
    pub fn new(
        kernel: &'a Matrix,
        targets: &'a Vector,
        c: f64,
        tube_epsilon: f64,
        tolerance: f64,
        max_iter: usize,
    ) -> Result<Self> {
        let l = targets.len();
        if kernel.shape() != &[l, l] {
            return Err(Error::dimension_mismatch(l, kernel.nrows()));
        }
        Ok(Self {
            kernel,
            targets,
            c,
            tube_epsilon,
            tolerance,
            max_iter,
        })
    }

    fn l(&self) -> usize {
        self.targets.len()
    }

    fn sign(&self, k: usize) -> f64 {
        if k < self.l() { 1.0 } else { -1.0 }
    }

    fn q(&self, a: usize, b: usize) -> f64 {
        let l = self.l();
        self.sign(a) * self.sign(b) * self.kernel[[a % l, b % l]]
    }

    fn in_up(&self, alpha: &Vector, t: usize) -> bool {
        (self.sign(t) > 0.0 && alpha[t] < self.c) || (self.sign(t) < 0.0 && alpha[t] > 0.0)
    }

    fn in_low(&self, alpha: &Vector, t: usize) -> bool {
        (self.sign(t) > 0.0 && alpha[t] > 0.0) || (self.sign(t) < 0.0 && alpha[t] < self.c)
    }

    /// Maximal violating pair, or `None` once the KKT gap is below tolerance.
    fn select_pair(&self, alpha: &Vector, gradient: &Vector) -> Option<(usize, usize)> {
        let mut g_max = f64::NEG_INFINITY;
        let mut g_min = f64::INFINITY;
        let mut best_i = None;
        let mut best_j = None;

        for t in 0..alpha.len() {
            let v = -self.sign(t) * gradient[t];
            if self.in_up(alpha, t) && v >= g_max {
                g_max = v;
                best_i = Some(t);
            }
            if self.in_low(alpha, t) && v <= g_min {
                g_min = v;
                best_j = Some(t);
            }
        }

        match (best_i, best_j) {
            (Some(i), Some(j)) if g_max - g_min >= self.tolerance && i != j => Some((i, j)),
            _ => None,
        }
    }

    fn take_step(&self, i: usize, j: usize, alpha: &mut Vector, gradient: &Vector) {
        let c = self.c;
        let q_ij = self.q(i, j);
        let q_ii = self.q(i, i);
        let q_jj = self.q(j, j);

        if self.sign(i) != self.sign(j) {
            let quad = (q_ii + q_jj + 2.0 * q_ij).max(TAU);
            let delta = (-gradient[i] - gradient[j]) / quad;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;

            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = -diff;
            }
            if diff > 0.0 {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else if alpha[j] > c {
                alpha[j] = c;
                alpha[i] = c + diff;
            }
        } else {
            let quad = (q_ii + q_jj - 2.0 * q_ij).max(TAU);
            let delta = (gradient[i] - gradient[j]) / quad;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;

            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
            } else if alpha[j] < 0.0 {
                alpha[j] = 0.0;
                alpha[i] = sum;
            }
            if sum > c {
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = sum;
            }
        }
    }

    pub fn solve(&self) -> Result<Solution> {
        let l = self.l();
        let n = 2 * l;
        let mut alpha = Vector::zeros(n);
        let mut gradient = Vector::from_shape_fn(n, |k| {
            if k < l {
                self.tube_epsilon - self.targets[k]
            } else {
                self.tube_epsilon + self.targets[k - l]
            }
        });

        let mut iterations = 0;
        while iterations < self.max_iter {
            let Some((i, j)) = self.select_pair(&alpha, &gradient) else {
                break;
            };

            let (old_i, old_j) = (alpha[i], alpha[j]);
            self.take_step(i, j, &mut alpha, &gradient);
            let (delta_i, delta_j) = (alpha[i] - old_i, alpha[j] - old_j);
            for t in 0..n {
                gradient[t] += self.q(t, i) * delta_i + self.q(t, j) * delta_j;
            }
            iterations += 1;
        }

        if iterations == self.max_iter {
            warn!("SVR solver stopped at max_iter = {} before converging", self.max_iter);
        }

        let rho = self.rho(&alpha, &gradient);
        let coefficients = Vector::from_shape_fn(l, |k| alpha[k] - alpha[k + l]);
        debug!("SVR solver finished after {} iterations, rho {:.6}", iterations, rho);

        Ok(Solution {
            coefficients,
            bias: -rho,
            iterations,
        })
    }

    /// Offset from free variables, or the midpoint of the feasible interval.
    fn rho(&self, alpha: &Vector, gradient: &Vector) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_sum = 0.0;
        let mut free_count = 0usize;

        for t in 0..alpha.len() {
            let yg = self.sign(t) * gradient[t];
            let positive = self.sign(t) > 0.0;
            if alpha[t] >= self.c {
                if positive {
                    lower = lower.max(yg);
                } else {
                    upper = upper.min(yg);
                }
            } else if alpha[t] <= 0.0 {
                if positive {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else {
                free_count += 1;
                free_sum += yg;
            }
        }

        if free_count > 0 {
            free_sum / free_count as f64
        } else {
            (upper + lower) / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn linear_gram(x: &Vector) -> Matrix {
        Matrix::from_shape_fn((x.len(), x.len()), |(i, j)| x[i] * x[j])
    }

    #[test]
    fn test_fits_line_within_tube() {
        let x = array![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = x.mapv(|v| 2.0 * v + 1.0);
        let gram = linear_gram(&x);

        let solution = EpsilonSvr::new(&gram, &y, 100.0, 0.1, 1e-6, 100_000)
            .unwrap()
            .solve()
            .unwrap();
        let predictions = gram.t().dot(&solution.coefficients) + solution.bias;
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() <= 0.1 + 1e-3, "prediction {} target {}", p, t);
        }
        assert!((solution.coefficients.sum()).abs() < 1e-9);
    }

    #[test]
    fn test_wide_tube_gives_no_support_vectors() {
        let x = array![0.0, 1.0, 2.0];
        let y = array![0.1, 0.0, -0.1];
        let gram = linear_gram(&x);

        let solution = EpsilonSvr::new(&gram, &y, 1.0, 1.0, 1e-6, 1000)
            .unwrap()
            .solve()
            .unwrap();
        assert!(solution.coefficients.iter().all(|&c| c == 0.0));
        assert_eq!(solution.iterations, 0);
        assert!(solution.bias.abs() <= 1.0);
    }

    #[test]
    fn test_coefficients_bounded_by_c() {
        let x: Vector = array![0.0, 1.0, 2.0, 3.0];
        let y = array![0.0, 10.0, -10.0, 5.0];
        let gram = Matrix::from_shape_fn((4, 4), |(i, j)| (-(x[i] - x[j]).powi(2)).exp());

        let solution = EpsilonSvr::new(&gram, &y, 0.5, 0.01, 1e-6, 100_000)
            .unwrap()
            .solve()
            .unwrap();
        assert!(solution.coefficients.iter().all(|c| c.abs() <= 0.5 + 1e-12));
    }

    #[test]
    fn test_shape_mismatch() {
        let gram = Matrix::zeros((2, 2));
        let y = array![1.0, 2.0, 3.0];
        assert!(EpsilonSvr::new(&gram, &y, 1.0, 0.1, 1e-3, 10).is_err());
    }
}
