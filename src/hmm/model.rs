use super::log_sum_exp_iter;
use crate::{Error, Matrix, Result, StringWordFeatures, Vector};
use ndarray::{Array, Axis};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

const DEFAULT_SEED: u64 = 42;

/// Probabilities of a discrete HMM. Rows of `transition` and `emission` sum to one.
#[derive(Clone, Debug, PartialEq)]
pub struct HmmParameters {
    initial: Vector,
    transition: Matrix,
    emission: Matrix,
    log_initial: Vector,
    log_transition: Matrix,
    log_emission: Matrix,
}

impl HmmParameters {
    /// Validates shapes and row sums (tolerance `1e-6`).
    pub fn new(initial: Vector, transition: Matrix, emission: Matrix) -> Result<Self> {
        let n = initial.len();
        if n == 0 {
            return Err(Error::invalid_parameter("an HMM needs at least one state"));
        }
        if transition.shape() != &[n, n] {
            return Err(Error::dimension_mismatch(n, transition.nrows()));
        }
        if emission.nrows() != n || emission.ncols() == 0 {
            return Err(Error::dimension_mismatch(n, emission.nrows()));
        }

        let tol = 1e-6;
        let sums = std::iter::once(initial.sum())
            .chain(transition.sum_axis(Axis(1)))
            .chain(emission.sum_axis(Axis(1)));
        for sum in sums {
            if (sum - 1.0).abs() > tol {
                return Err(Error::invalid_parameter(format!(
                    "probabilities sum to {}, expected 1",
                    sum
                )));
            }
        }
        if initial.iter().chain(transition.iter()).chain(emission.iter()).any(|&p| p < 0.0) {
            return Err(Error::invalid_parameter("probabilities must be non-negative"));
        }

        Ok(Self::from_normalized(initial, transition, emission))
    }

    pub(super) fn from_normalized(initial: Vector, transition: Matrix, emission: Matrix) -> Self {
        Self {
            log_initial: initial.mapv(f64::ln),
            log_transition: transition.mapv(f64::ln),
            log_emission: emission.mapv(f64::ln),
            initial,
            transition,
            emission,
        }
    }

    /// Random row-stochastic parameters.
    pub(super) fn random(n_states: usize, n_symbols: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut draw = |shape: (usize, usize)| {
            normalize_rows(Array::random_using(shape, Uniform::new(0.1, 1.0), &mut rng))
        };
        let initial = draw((1, n_states)).index_axis_move(Axis(0), 0);
        let transition = draw((n_states, n_states));
        let emission = draw((n_states, n_symbols));
        Self::from_normalized(initial, transition, emission)
    }

    pub fn n_states(&self) -> usize {
        self.initial.len()
    }

    pub fn n_symbols(&self) -> usize {
        self.emission.ncols()
    }

    pub fn initial(&self) -> &Vector {
        &self.initial
    }

    pub fn transition(&self) -> &Matrix {
        &self.transition
    }

    pub fn emission(&self) -> &Matrix {
        &self.emission
    }

    pub(super) fn log_initial(&self) -> &Vector {
        &self.log_initial
    }

    pub(super) fn log_transition(&self) -> &Matrix {
        &self.log_transition
    }

    pub(super) fn log_emission(&self) -> &Matrix {
        &self.log_emission
    }
}

/// Divides each row by its sum; all-zero rows become uniform.
pub(super) fn normalize_rows(mut m: Matrix) -> Matrix {
    let width = m.ncols() as f64;
    for mut row in m.axis_iter_mut(Axis(0)) {
        let sum = row.sum();
        if sum > 0.0 {
            row /= sum;
        } else {
            row.fill(1.0 / width);
        }
    }
    m
}

/// Forward pass in log-space.
///
/// `pre[[t, i]]` is the log probability of `o_0..o_{t-1}` and being in `i` at
/// `t` before emitting `o_t`; `alpha = pre + log b_i(o_t)`.
pub(super) struct Forward {
    pub pre: Matrix,
    pub alpha: Matrix,
    pub log_likelihood: f64,
}

/// A discrete HMM bound to a set of observation sequences.
#[derive(Clone, Debug)]
pub struct Hmm {
    pub(super) n_states: usize,
    pub(super) n_symbols: usize,
    pub(super) pseudo: f64,
    pub(super) max_iter: usize,
    pub(super) tolerance: f64,
    pub(super) parameters: Arc<HmmParameters>,
    observations: Option<StringWordFeatures>,
    pub(super) trained: bool,
}

impl Hmm {
    /// An untrained model over `observations` with `n_states` hidden states.
    ///
    /// `n_symbols` has to match the word alphabet of `observations`; `pseudo`
    /// is added to every expected count during training.
    pub fn new(
        observations: &StringWordFeatures,
        n_states: usize,
        n_symbols: usize,
        pseudo: f64,
    ) -> Result<Self> {
        if n_states == 0 {
            return Err(Error::invalid_parameter("n_states must be > 0"));
        }
        if !(pseudo >= 0.0 && pseudo.is_finite()) {
            return Err(Error::invalid_parameter(format!(
                "pseudo count must be non-negative, got {}",
                pseudo
            )));
        }
        if observations.num_symbols() != n_symbols {
            return Err(Error::dimension_mismatch(n_symbols, observations.num_symbols()));
        }

        Ok(Self {
            n_states,
            n_symbols,
            pseudo,
            max_iter: 100,
            tolerance: 1e-5,
            parameters: Arc::new(HmmParameters::random(n_states, n_symbols, DEFAULT_SEED)),
            observations: Some(observations.clone()),
            trained: false,
        })
    }

    /// Re-draws the starting parameters from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.parameters = Arc::new(HmmParameters::random(self.n_states, self.n_symbols, seed));
        self.trained = false;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        if max_iter == 0 {
            panic!("max_iter must be > 0, got {}", max_iter);
        }
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        if tolerance <= 0.0 {
            panic!("tolerance must be positive, got {}", tolerance);
        }
        self.tolerance = tolerance;
        self
    }

    /// Replaces the parameters with known ones, e.g. from another run.
    pub fn set_parameters(&mut self, parameters: HmmParameters) -> Result<()> {
        if parameters.n_states() != self.n_states || parameters.n_symbols() != self.n_symbols {
            return Err(Error::dimension_mismatch(
                self.n_states * self.n_symbols,
                parameters.n_states() * parameters.n_symbols(),
            ));
        }
        self.parameters = Arc::new(parameters);
        self.trained = true;
        Ok(())
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    pub fn n_symbols(&self) -> usize {
        self.n_symbols
    }

    pub fn pseudo(&self) -> f64 {
        self.pseudo
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn parameters(&self) -> &HmmParameters {
        &self.parameters
    }

    /// True when both models read the very same parameter storage.
    pub fn shares_parameters_with(&self, other: &Hmm) -> bool {
        Arc::ptr_eq(&self.parameters, &other.parameters)
    }

    pub fn observations(&self) -> Option<&StringWordFeatures> {
        self.observations.as_ref()
    }

    /// Binds new sequences. They must encode words like the current ones.
    pub fn set_observations(&mut self, observations: &StringWordFeatures) -> Result<()> {
        if observations.num_symbols() != self.n_symbols {
            return Err(Error::AlphabetMismatch(format!(
                "model emits {} symbols, observations use {}",
                self.n_symbols,
                observations.num_symbols()
            )));
        }
        if let Some(current) = &self.observations {
            current.check_compatible(observations)?;
        }
        self.observations = Some(observations.clone());
        Ok(())
    }

    pub(super) fn bound_observations(&self) -> Result<&StringWordFeatures> {
        self.observations.as_ref().ok_or(Error::NotInitialized("HMM"))
    }

    /// Number of free parameters: initial, transition and emission entries.
    pub fn num_parameters(&self) -> usize {
        self.n_states + self.n_states * self.n_states + self.n_states * self.n_symbols
    }

    fn validate_sequence(&self, sequence: &[usize]) -> Result<()> {
        if sequence.is_empty() {
            return Err(Error::empty_input("observation sequence is empty"));
        }
        if let Some((t, &o)) = sequence.iter().enumerate().find(|&(_, &o)| o >= self.n_symbols) {
            return Err(Error::invalid_parameter(format!(
                "observation[{}] = {} out of range (n_symbols = {})",
                t, o, self.n_symbols
            )));
        }
        Ok(())
    }

    pub(super) fn forward_pass(&self, sequence: &[usize]) -> Result<Forward> {
        self.validate_sequence(sequence)?;
        let p = &*self.parameters;
        let n = self.n_states;
        let t_len = sequence.len();
        let mut pre = Matrix::from_elem((t_len, n), f64::NEG_INFINITY);
        let mut alpha = Matrix::from_elem((t_len, n), f64::NEG_INFINITY);

        for i in 0..n {
            pre[[0, i]] = p.log_initial()[i];
            alpha[[0, i]] = pre[[0, i]] + p.log_emission()[[i, sequence[0]]];
        }

        for t in 1..t_len {
            for j in 0..n {
                pre[[t, j]] =
                    log_sum_exp_iter((0..n).map(|i| alpha[[t - 1, i]] + p.log_transition()[[i, j]]));
                alpha[[t, j]] = pre[[t, j]] + p.log_emission()[[j, sequence[t]]];
            }
        }

        let log_likelihood = log_sum_exp_iter(alpha.row(t_len - 1).iter().copied());
        Ok(Forward { pre, alpha, log_likelihood })
    }

    /// `(alpha, log P(sequence))` with `alpha[[t, i]] = log P(o_0..o_t, q_t = i)`.
    pub fn forward(&self, sequence: &[usize]) -> Result<(Matrix, f64)> {
        let fwd = self.forward_pass(sequence)?;
        Ok((fwd.alpha, fwd.log_likelihood))
    }

    /// `beta[[t, i]] = log P(o_{t+1}..o_{T-1} | q_t = i)`.
    pub fn backward(&self, sequence: &[usize]) -> Result<Matrix> {
        self.validate_sequence(sequence)?;
        let p = &*self.parameters;
        let n = self.n_states;
        let t_len = sequence.len();
        let mut beta = Matrix::from_elem((t_len, n), f64::NEG_INFINITY);
        beta.row_mut(t_len - 1).fill(0.0);

        for t in (0..t_len - 1).rev() {
            let next = sequence[t + 1];
            for i in 0..n {
                beta[[t, i]] = log_sum_exp_iter((0..n).map(|j| {
                    p.log_transition()[[i, j]] + p.log_emission()[[j, next]] + beta[[t + 1, j]]
                }));
            }
        }

        Ok(beta)
    }

    pub fn log_likelihood(&self, sequence: &[usize]) -> Result<f64> {
        Ok(self.forward_pass(sequence)?.log_likelihood)
    }

    /// Sum of per-sequence log-likelihoods over the bound observations.
    pub fn model_log_likelihood(&self) -> Result<f64> {
        self.bound_observations()?
            .sequences()
            .map(|seq| self.log_likelihood(seq))
            .sum()
    }

    /// Most likely state path and its log probability.
    pub fn viterbi(&self, sequence: &[usize]) -> Result<(Vec<usize>, f64)> {
        self.validate_sequence(sequence)?;
        let p = &*self.parameters;
        let n = self.n_states;
        let t_len = sequence.len();
        let mut delta = Matrix::from_elem((t_len, n), f64::NEG_INFINITY);
        let mut psi = vec![vec![0usize; n]; t_len];

        for i in 0..n {
            delta[[0, i]] = p.log_initial()[i] + p.log_emission()[[i, sequence[0]]];
        }

        for t in 1..t_len {
            for j in 0..n {
                let mut best_val = f64::NEG_INFINITY;
                let mut best_state = 0;
                for i in 0..n {
                    let v = delta[[t - 1, i]] + p.log_transition()[[i, j]];
                    if v > best_val {
                        best_val = v;
                        best_state = i;
                    }
                }
                delta[[t, j]] = best_val + p.log_emission()[[j, sequence[t]]];
                psi[t][j] = best_state;
            }
        }

        let mut best_final = 0;
        let mut best_score = f64::NEG_INFINITY;
        for i in 0..n {
            if delta[[t_len - 1, i]] > best_score {
                best_score = delta[[t_len - 1, i]];
                best_final = i;
            }
        }

        let mut path = vec![0usize; t_len];
        path[t_len - 1] = best_final;
        for t in (0..t_len - 1).rev() {
            path[t] = psi[t + 1][path[t + 1]];
        }

        Ok((path, best_score))
    }

    /// Gradient of `log P(sequence)` with respect to every parameter, ordered
    /// initial, transition (row-major), emission (row-major).
    pub fn log_derivatives(&self, sequence: &[usize]) -> Result<Vector> {
        let fwd = self.forward_pass(sequence)?;
        let beta = self.backward(sequence)?;
        let p = &*self.parameters;
        let (n, m) = (self.n_states, self.n_symbols);
        let ll = fwd.log_likelihood;
        let mut grad = Vector::zeros(self.num_parameters());

        // d/d pi_i = b_i(o_0) beta_0(i) / P
        for i in 0..n {
            grad[i] = (p.log_emission()[[i, sequence[0]]] + beta[[0, i]] - ll).exp();
        }

        // d/d a_ij = sum_t alpha_t(i) b_j(o_{t+1}) beta_{t+1}(j) / P
        let offset = n;
        for i in 0..n {
            for j in 0..n {
                let log_terms = (0..sequence.len() - 1).map(|t| {
                    fwd.alpha[[t, i]] + p.log_emission()[[j, sequence[t + 1]]] + beta[[t + 1, j]]
                });
                grad[offset + i * n + j] = (log_sum_exp_iter(log_terms) - ll).exp();
            }
        }

        // d/d b_ik = sum_{t: o_t = k} pre_t(i) beta_t(i) / P
        let offset = n + n * n;
        for (t, &o) in sequence.iter().enumerate() {
            for i in 0..n {
                let idx = offset + i * m + o;
                grad[idx] += (fwd.pre[[t, i]] + beta[[t, i]] - ll).exp();
            }
        }

        Ok(grad)
    }
}
