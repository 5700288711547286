use super::{Kernel, KernelFunction, KernelNormalizer};
use crate::{Error, RealFeatures, Result};
use ndarray::ArrayView1;

/// `k(x, y) = (x·y + c)^degree` with `c = 1` when inhomogeneous, else `0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polynomial {
    degree: i32,
    inhomogeneous: bool,
}

impl Polynomial {
    pub fn new(degree: u32, inhomogeneous: bool) -> Result<Self> {
        if degree == 0 {
            return Err(Error::invalid_parameter("polynomial degree must be at least 1"));
        }
        let degree = i32::try_from(degree).map_err(|_| {
            Error::invalid_parameter(format!("polynomial degree {} is too large", degree))
        })?;
        Ok(Self { degree, inhomogeneous })
    }

    pub fn degree(&self) -> u32 {
        self.degree as u32
    }

    pub fn inhomogeneous(&self) -> bool {
        self.inhomogeneous
    }
}

impl KernelFunction for Polynomial {
    const NAME: &'static str = "PolyKernel";

    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        let offset = if self.inhomogeneous { 1.0 } else { 0.0 };
        (x.dot(&y) + offset).powi(self.degree)
    }
}

pub type PolyKernel = Kernel<Polynomial>;

impl Kernel<Polynomial> {
    /// `use_normalization` installs [`KernelNormalizer::SqrtDiag`].
    pub fn new(
        lhs: &RealFeatures,
        rhs: &RealFeatures,
        degree: u32,
        inhomogeneous: bool,
        use_normalization: bool,
    ) -> Result<Self> {
        let mut kernel = Self::from_function(Polynomial::new(degree, inhomogeneous)?);
        if use_normalization {
            kernel.set_normalizer(KernelNormalizer::SqrtDiag)?;
        }
        kernel.init(lhs, rhs)?;
        Ok(kernel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_poly_kernel_unnormalized() {
        let feats = RealFeatures::new(array![[1.0, 2.0], [0.0, 1.0]]).unwrap();
        let mut kernel = PolyKernel::new(&feats, &feats, 2, true, false).unwrap();
        let km = kernel.kernel_matrix().unwrap();
        // (x·y + 1)^2
        assert_eq!(km, array![[36.0, 9.0], [9.0, 4.0]]);
    }

    #[test]
    fn test_poly_kernel_normalized_diagonal() {
        let feats = RealFeatures::new(array![[1.0, 2.0], [0.0, 1.0], [-3.0, 0.5]]).unwrap();
        let mut kernel = PolyKernel::new(&feats, &feats, 1, false, true).unwrap();
        let km = kernel.kernel_matrix().unwrap();
        for i in 0..3 {
            assert!((km[[i, i]] - 1.0).abs() < 1e-12);
        }
        assert!(km.iter().all(|v| v.abs() <= 1.0 + 1e-12));
        assert_eq!(km, km.t());
    }

    #[test]
    fn test_poly_kernel_zero_degree() {
        let feats = RealFeatures::new(array![[1.0]]).unwrap();
        assert!(PolyKernel::new(&feats, &feats, 0, false, false).is_err());
    }

    #[test]
    fn test_poly_degree_out_of_range() {
        assert!(Polynomial::new(u32::MAX, false).is_err());
        assert_eq!(Polynomial::new(i32::MAX as u32, true).unwrap().degree(), i32::MAX as u32);
    }
}
