use super::log_sum_exp_iter;
use super::model::{normalize_rows, Hmm, HmmParameters};
use crate::{Error, Matrix, Result, Vector};
use log::{debug, info};
use ndarray::Axis;
use std::sync::Arc;

/// Training schedule for [`Hmm::baum_welch_viterbi_train`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrainingKind {
    /// Unconstrained state paths over every bound observation.
    #[default]
    Normal,
}

/// Expected (or hard) counts gathered over all bound sequences.
struct Counts {
    initial: Vector,
    transition: Matrix,
    emission: Matrix,
}

impl Counts {
    fn new(n: usize, m: usize) -> Self {
        Self {
            initial: Vector::zeros(n),
            transition: Matrix::zeros((n, n)),
            emission: Matrix::zeros((n, m)),
        }
    }

    /// Adds `pseudo` everywhere and normalizes into probabilities.
    fn into_parameters(self, pseudo: f64) -> HmmParameters {
        let n = self.initial.len();
        let initial = normalize_rows((self.initial + pseudo).insert_axis(Axis(0)))
            .index_axis_move(Axis(0), 0);
        let transition = normalize_rows(self.transition + pseudo);
        let emission = normalize_rows(self.emission + pseudo);
        debug_assert_eq!(initial.len(), n);
        HmmParameters::from_normalized(initial, transition, emission)
    }
}

impl Hmm {
    /// Baum-Welch until the log-likelihood stalls, then Viterbi training on
    /// the best state paths until their score stalls.
    pub fn baum_welch_viterbi_train(&mut self, kind: TrainingKind) -> Result<()> {
        match kind {
            TrainingKind::Normal => {
                let ll = self.baum_welch()?;
                let score = self.viterbi_train()?;
                self.trained = true;
                info!(
                    "HMM trained: {} states, {} symbols, log-likelihood {:.4}, viterbi score {:.4}",
                    self.n_states, self.n_symbols, ll, score
                );
                Ok(())
            }
        }
    }

    /// Returns the final total log-likelihood of the bound observations.
    fn baum_welch(&mut self) -> Result<f64> {
        let mut prev_ll = f64::NEG_INFINITY;

        for iteration in 0..self.max_iter {
            let (counts, ll) = self.expected_counts()?;
            if !ll.is_finite() {
                return Err(Error::invalid_parameter(
                    "observations have zero probability under the model",
                ));
            }
            debug!("baum-welch iteration {}: log-likelihood {:.6}", iteration, ll);

            if prev_ll.is_finite() && (ll - prev_ll).abs() < self.tolerance {
                return Ok(ll);
            }
            prev_ll = ll;
            self.parameters = Arc::new(counts.into_parameters(self.pseudo));
        }

        self.model_log_likelihood()
    }

    /// E-step: posterior state and transition counts under the current parameters.
    fn expected_counts(&self) -> Result<(Counts, f64)> {
        let observations = self.bound_observations()?;
        let p = &*self.parameters;
        let (n, m) = (self.n_states, self.n_symbols);
        let mut counts = Counts::new(n, m);
        let mut total_ll = 0.0;

        for seq in observations.sequences() {
            let fwd = self.forward_pass(seq)?;
            let beta = self.backward(seq)?;
            let ll = fwd.log_likelihood;
            total_ll += ll;
            if !ll.is_finite() {
                continue;
            }

            for (t, &o) in seq.iter().enumerate() {
                for i in 0..n {
                    let gamma = (fwd.alpha[[t, i]] + beta[[t, i]] - ll).exp();
                    if t == 0 {
                        counts.initial[i] += gamma;
                    }
                    counts.emission[[i, o]] += gamma;
                }
            }

            for i in 0..n {
                for j in 0..n {
                    let log_xi = (0..seq.len() - 1).map(|t| {
                        fwd.alpha[[t, i]]
                            + p.log_transition()[[i, j]]
                            + p.log_emission()[[j, seq[t + 1]]]
                            + beta[[t + 1, j]]
                    });
                    counts.transition[[i, j]] += (log_sum_exp_iter(log_xi) - ll).exp();
                }
            }
        }

        Ok((counts, total_ll))
    }

    /// Hard-count re-estimation from Viterbi paths. Returns the final total score.
    fn viterbi_train(&mut self) -> Result<f64> {
        let mut best_score = self.viterbi_score()?;

        for iteration in 0..self.max_iter {
            let observations = self.bound_observations()?;
            let mut counts = Counts::new(self.n_states, self.n_symbols);
            for seq in observations.sequences() {
                let (path, _) = self.viterbi(seq)?;
                counts.initial[path[0]] += 1.0;
                for t in 0..seq.len() {
                    counts.emission[[path[t], seq[t]]] += 1.0;
                    if t + 1 < seq.len() {
                        counts.transition[[path[t], path[t + 1]]] += 1.0;
                    }
                }
            }

            let previous = Arc::clone(&self.parameters);
            self.parameters = Arc::new(counts.into_parameters(self.pseudo));
            let score = self.viterbi_score()?;
            debug!("viterbi iteration {}: score {:.6}", iteration, score);

            if score <= best_score + self.tolerance {
                if score < best_score {
                    self.parameters = previous;
                } else {
                    best_score = score;
                }
                break;
            }
            best_score = score;
        }

        Ok(best_score)
    }

    fn viterbi_score(&self) -> Result<f64> {
        self.bound_observations()?
            .sequences()
            .map(|seq| self.viterbi(seq).map(|(_, score)| score))
            .sum()
    }
}
