//! Kernels over [`RealFeatures`].
//!
//! A [`Kernel`] pairs a pointwise [`KernelFunction`] with a [`KernelNormalizer`]
//! and the two feature containers it is currently bound to:
//! - `LinearKernel`: `x·y`
//! - `GaussianKernel`: `exp(-‖x−y‖² / width)`
//! - `PolyKernel`: `(x·y + c)^degree`
//!
//! # Examples
//!
//! ```rust
//! use kernelkit::{KernelNormalizer, LinearKernel, RealFeatures};
//! use ndarray::array;
//!
//! let train = RealFeatures::new(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! let test = RealFeatures::new(array![[1.0, 0.0]]).unwrap();
//!
//! let mut kernel = LinearKernel::new();
//! kernel.set_normalizer(KernelNormalizer::AvgDiag { scale: 2.0 }).unwrap();
//! kernel.init(&train, &train).unwrap();
//! let km_train = kernel.kernel_matrix().unwrap();
//! assert_eq!(km_train[[0, 1]], 5.5);
//!
//! kernel.init(&train, &test).unwrap();
//! let km_test = kernel.kernel_matrix().unwrap();
//! assert_eq!(km_test.shape(), &[2, 1]);
//! ```

mod normalizer;
mod linear;
mod gaussian;
mod polynomial;

pub use normalizer::KernelNormalizer;
pub use linear::{Linear, LinearKernel};
pub use gaussian::{Gaussian, GaussianKernel};
pub use polynomial::{PolyKernel, Polynomial};

use crate::{Error, Matrix, RealFeatures, Result};
use log::debug;
use ndarray::ArrayView1;
use normalizer::ResolvedNormalizer;
use std::fmt;

/// Pointwise similarity of two feature vectors.
pub trait KernelFunction: Clone + fmt::Debug {
    const NAME: &'static str;

    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64;
}

/// Lifecycle of a distance or kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComputationState {
    /// No features bound yet.
    Unconfigured,
    /// Features bound, no matrix computed for this pair.
    Bound,
    /// A matrix has been computed for the current pair.
    Evaluated,
}

#[derive(Clone, Debug)]
struct Binding {
    lhs: RealFeatures,
    rhs: RealFeatures,
    normalizer: ResolvedNormalizer,
}

#[derive(Clone, Debug)]
pub struct Kernel<F: KernelFunction> {
    function: F,
    normalizer: KernelNormalizer,
    binding: Option<Binding>,
    state: ComputationState,
}

impl<F: KernelFunction> Kernel<F> {
    /// An unbound kernel; call [`init`](Self::init) before evaluating.
    pub fn from_function(function: F) -> Self {
        Self {
            function,
            normalizer: KernelNormalizer::Identity,
            binding: None,
            state: ComputationState::Unconfigured,
        }
    }

    pub fn with_function(function: F, lhs: &RealFeatures, rhs: &RealFeatures) -> Result<Self> {
        let mut kernel = Self::from_function(function);
        kernel.init(lhs, rhs)?;
        Ok(kernel)
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    pub fn normalizer(&self) -> &KernelNormalizer {
        &self.normalizer
    }

    /// Installs a normalizer, re-resolving it against the bound pair if any.
    ///
    /// On error the kernel keeps its previous normalizer and binding.
    pub fn set_normalizer(&mut self, normalizer: KernelNormalizer) -> Result<()> {
        normalizer.validate()?;
        if let Some(binding) = &mut self.binding {
            binding.normalizer = normalizer.resolve(&self.function, &binding.lhs, &binding.rhs)?;
            self.state = ComputationState::Bound;
        }
        self.normalizer = normalizer;
        Ok(())
    }

    /// Binds `lhs x rhs`, discarding everything derived from the previous pair.
    pub fn init(&mut self, lhs: &RealFeatures, rhs: &RealFeatures) -> Result<()> {
        if lhs.num_features() != rhs.num_features() {
            return Err(Error::dimension_mismatch(lhs.num_features(), rhs.num_features()));
        }

        let normalizer = self.normalizer.resolve(&self.function, lhs, rhs)?;
        self.binding = Some(Binding {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
            normalizer,
        });
        self.state = ComputationState::Bound;
        debug!(
            "{} bound to {}x{} vectors",
            F::NAME,
            lhs.num_vectors(),
            rhs.num_vectors()
        );
        Ok(())
    }

    pub fn state(&self) -> ComputationState {
        self.state
    }

    pub fn lhs(&self) -> Option<&RealFeatures> {
        self.binding.as_ref().map(|b| &b.lhs)
    }

    pub fn rhs(&self) -> Option<&RealFeatures> {
        self.binding.as_ref().map(|b| &b.rhs)
    }

    pub fn num_lhs(&self) -> usize {
        self.lhs().map_or(0, RealFeatures::num_vectors)
    }

    pub fn num_rhs(&self) -> usize {
        self.rhs().map_or(0, RealFeatures::num_vectors)
    }

    /// Normalized `k(lhs[i], rhs[j])`.
    pub fn kernel(&self, i: usize, j: usize) -> Result<f64> {
        let binding = self.binding()?;
        if i >= binding.lhs.num_vectors() || j >= binding.rhs.num_vectors() {
            return Err(Error::invalid_parameter(format!(
                "kernel index ({}, {}) out of range for {}x{}",
                i,
                j,
                binding.lhs.num_vectors(),
                binding.rhs.num_vectors()
            )));
        }
        Ok(self.entry(binding, i, j))
    }

    /// `num_lhs x num_rhs` kernel values for the current pair.
    pub fn kernel_matrix(&mut self) -> Result<Matrix> {
        let binding = self.binding()?;
        let symmetric = binding.lhs.same_as(&binding.rhs);
        let (n, m) = (binding.lhs.num_vectors(), binding.rhs.num_vectors());
        let mut km = Matrix::zeros((n, m));

        for i in 0..n {
            let from = if symmetric { i } else { 0 };
            for j in from..m {
                let k = self.entry(binding, i, j);
                km[[i, j]] = k;
                if symmetric {
                    km[[j, i]] = k;
                }
            }
        }

        self.state = ComputationState::Evaluated;
        debug!("{} computed {}x{} matrix", F::NAME, n, m);
        Ok(km)
    }

    fn binding(&self) -> Result<&Binding> {
        self.binding.as_ref().ok_or(Error::NotInitialized(F::NAME))
    }

    fn entry(&self, binding: &Binding, i: usize, j: usize) -> f64 {
        let raw = self
            .function
            .compute(binding.lhs.vector(i), binding.rhs.vector(j));
        binding.normalizer.normalize(raw, i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_unbound_kernel_fails() {
        let mut kernel = LinearKernel::new();
        assert_eq!(kernel.state(), ComputationState::Unconfigured);
        assert_eq!(
            kernel.kernel_matrix().unwrap_err(),
            Error::NotInitialized("LinearKernel")
        );
        assert!(kernel.kernel(0, 0).is_err());
    }

    #[test]
    fn test_state_transitions() {
        let train = RealFeatures::new(array![[1.0], [2.0]]).unwrap();
        let test = RealFeatures::new(array![[3.0]]).unwrap();
        let mut kernel = LinearKernel::with_features(&train, &train).unwrap();
        assert_eq!(kernel.state(), ComputationState::Bound);

        kernel.kernel_matrix().unwrap();
        assert_eq!(kernel.state(), ComputationState::Evaluated);

        kernel.init(&train, &test).unwrap();
        assert_eq!(kernel.state(), ComputationState::Bound);
        let km = kernel.kernel_matrix().unwrap();
        assert_eq!(km, array![[3.0], [6.0]]);
        assert_eq!(kernel.state(), ComputationState::Evaluated);
    }

    #[test]
    fn test_kernel_index_out_of_range() {
        let train = RealFeatures::new(array![[1.0], [2.0]]).unwrap();
        let kernel = LinearKernel::with_features(&train, &train).unwrap();
        assert!((kernel.kernel(1, 1).unwrap() - 4.0).abs() < 1e-10);
        assert!(kernel.kernel(2, 0).is_err());
    }

    #[test]
    fn test_init_dimension_mismatch() {
        let a = RealFeatures::new(array![[1.0, 2.0]]).unwrap();
        let b = RealFeatures::new(array![[1.0]]).unwrap();
        let mut kernel = LinearKernel::new();
        assert_eq!(kernel.init(&a, &b).unwrap_err(), Error::dimension_mismatch(2, 1));
        assert_eq!(kernel.state(), ComputationState::Unconfigured);
    }

    #[test]
    fn test_set_normalizer_after_init_applies() {
        let train = RealFeatures::new(array![[2.0], [4.0]]).unwrap();
        let mut kernel = LinearKernel::with_features(&train, &train).unwrap();
        kernel.set_normalizer(KernelNormalizer::AvgDiag { scale: 4.0 }).unwrap();
        let km = kernel.kernel_matrix().unwrap();
        assert_eq!(km, array![[1.0, 2.0], [2.0, 4.0]]);
    }

    #[test]
    fn test_failed_set_normalizer_keeps_binding() {
        let zeros = RealFeatures::new(array![[0.0, 0.0], [0.0, 0.0]]).unwrap();
        let mut kernel = LinearKernel::with_features(&zeros, &zeros).unwrap();

        assert!(kernel.set_normalizer(KernelNormalizer::AvgDiag { scale: 0.0 }).is_err());
        assert_eq!(kernel.normalizer(), &KernelNormalizer::Identity);
        assert_eq!(kernel.state(), ComputationState::Bound);
        assert_eq!(kernel.num_lhs(), 2);
        assert_eq!(kernel.kernel_matrix().unwrap(), Matrix::zeros((2, 2)));
        assert!(kernel.init(&zeros, &zeros).is_ok());
    }
}
