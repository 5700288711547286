pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod error;
pub mod toy;
pub mod features;
pub mod distance;
pub mod kernel;
pub mod hmm;
pub mod regression;
pub mod metrics;
pub mod drivers;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

pub use error::{Error, Result};
pub use features::{Alphabet, Labels, RealFeatures, StringCharFeatures, StringWordFeatures};
pub use distance::EuclideanDistance;
pub use kernel::{
    ComputationState, Gaussian, GaussianKernel, Kernel, KernelFunction, KernelNormalizer, Linear,
    LinearKernel, PolyKernel, Polynomial,
};
pub use hmm::{Hmm, HmmParameters, TopFeatures, TrainingKind};
pub use regression::SvrLight;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_types_work() {
        let vec = Vector::zeros(5);
        let mat = Matrix::zeros((3, 4));
        assert_eq!(vec.len(), 5);
        assert_eq!(mat.shape(), &[3, 4]);
    }
}
