use super::Hmm;
use crate::{Error, Matrix, RealFeatures, Result};
use log::debug;
use ndarray::s;

/// TOP ("tangent vector of posterior log-odds") features of a positive and a
/// negative class model.
///
/// Row `x` is `[log P(x|pos) − log P(x|neg), ∇ log P(x|pos), −∇ log P(x|neg)]`,
/// computed for every sequence both models are currently bound to.
#[derive(Clone, Debug)]
pub struct TopFeatures {
    features: RealFeatures,
}

impl TopFeatures {
    pub fn new(pos: &Hmm, neg: &Hmm) -> Result<Self> {
        if pos.n_states() != neg.n_states() || pos.n_symbols() != neg.n_symbols() {
            return Err(Error::dimension_mismatch(pos.num_parameters(), neg.num_parameters()));
        }

        let pos_obs = pos.bound_observations()?;
        let neg_obs = neg.bound_observations()?;
        pos_obs.check_compatible(neg_obs)?;
        if pos_obs.num_vectors() != neg_obs.num_vectors() {
            return Err(Error::dimension_mismatch(pos_obs.num_vectors(), neg_obs.num_vectors()));
        }

        let n_params = pos.num_parameters();
        let width = Self::width(pos);
        let mut matrix = Matrix::zeros((pos_obs.num_vectors(), width));

        for (row, (pos_seq, neg_seq)) in pos_obs.sequences().zip(neg_obs.sequences()).enumerate() {
            let pos_ll = pos.log_likelihood(pos_seq)?;
            let neg_ll = neg.log_likelihood(neg_seq)?;
            if !pos_ll.is_finite() || !neg_ll.is_finite() {
                return Err(Error::invalid_parameter(format!(
                    "sequence {} has zero probability under a class model \
                     (log-likelihoods {} / {}); train with a positive pseudo count",
                    row, pos_ll, neg_ll
                )));
            }
            matrix[[row, 0]] = pos_ll - neg_ll;
            matrix
                .slice_mut(s![row, 1..1 + n_params])
                .assign(&pos.log_derivatives(pos_seq)?);
            matrix
                .slice_mut(s![row, 1 + n_params..])
                .assign(&-neg.log_derivatives(neg_seq)?);
        }

        if let Some(bad) = matrix.iter().position(|v| !v.is_finite()) {
            return Err(Error::invalid_parameter(format!(
                "TOP feature ({}, {}) is not finite",
                bad / width,
                bad % width
            )));
        }

        debug!("TOP features: {} sequences x {} dimensions", matrix.nrows(), width);
        Ok(Self {
            features: RealFeatures::new(matrix)?,
        })
    }

    /// Feature dimension for models shaped like `model`.
    pub fn width(model: &Hmm) -> usize {
        1 + 2 * model.num_parameters()
    }

    pub fn features(&self) -> &RealFeatures {
        &self.features
    }

    pub fn into_real(self) -> RealFeatures {
        self.features
    }
}
