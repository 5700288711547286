use super::KernelFunction;
use crate::{Error, RealFeatures, Result, Vector};

/// Post-processing applied to every raw kernel value.
#[derive(Clone, Debug, PartialEq)]
pub enum KernelNormalizer {
    /// Raw values.
    Identity,
    /// Divide by `scale`. A non-positive scale is replaced by the mean
    /// self-similarity of the lhs vectors when features are bound.
    AvgDiag { scale: f64 },
    /// `k(x, y) / sqrt(k(x, x) * k(y, y))`, zero where a diagonal vanishes.
    SqrtDiag,
}

impl KernelNormalizer {
    pub(super) fn validate(&self) -> Result<()> {
        match self {
            KernelNormalizer::AvgDiag { scale } if !scale.is_finite() => Err(
                Error::invalid_parameter(format!("normalizer scale must be finite, got {}", scale)),
            ),
            _ => Ok(()),
        }
    }

    pub(super) fn resolve<F: KernelFunction>(
        &self,
        function: &F,
        lhs: &RealFeatures,
        rhs: &RealFeatures,
    ) -> Result<ResolvedNormalizer> {
        match *self {
            KernelNormalizer::Identity => Ok(ResolvedNormalizer::Identity),
            KernelNormalizer::AvgDiag { scale } if scale > 0.0 => Ok(ResolvedNormalizer::Scale(scale)),
            KernelNormalizer::AvgDiag { .. } => {
                let diag = self_similarities(function, lhs);
                let mean = diag.mean().unwrap_or(0.0);
                if mean <= 0.0 {
                    return Err(Error::invalid_parameter(format!(
                        "average kernel diagonal is {}, cannot normalize by it",
                        mean
                    )));
                }
                Ok(ResolvedNormalizer::Scale(mean))
            }
            KernelNormalizer::SqrtDiag => Ok(ResolvedNormalizer::SqrtDiag {
                lhs_diag: self_similarities(function, lhs),
                rhs_diag: self_similarities(function, rhs),
            }),
        }
    }
}

/// A normalizer with everything it needs from the bound pair precomputed.
#[derive(Clone, Debug)]
pub(super) enum ResolvedNormalizer {
    Identity,
    Scale(f64),
    SqrtDiag { lhs_diag: Vector, rhs_diag: Vector },
}

impl ResolvedNormalizer {
    pub(super) fn normalize(&self, value: f64, i: usize, j: usize) -> f64 {
        match self {
            ResolvedNormalizer::Identity => value,
            ResolvedNormalizer::Scale(scale) => value / scale,
            ResolvedNormalizer::SqrtDiag { lhs_diag, rhs_diag } => {
                let denom = lhs_diag[i] * rhs_diag[j];
                if denom > 0.0 { value / denom.sqrt() } else { 0.0 }
            }
        }
    }
}

fn self_similarities<F: KernelFunction>(function: &F, features: &RealFeatures) -> Vector {
    (0..features.num_vectors())
        .map(|i| function.compute(features.vector(i), features.vector(i)))
        .collect()
}
