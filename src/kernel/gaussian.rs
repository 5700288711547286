use super::{Kernel, KernelFunction};
use crate::{Error, RealFeatures, Result};
use ndarray::ArrayView1;

/// `k(x, y) = exp(-‖x−y‖² / width)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gaussian {
    width: f64,
}

impl Gaussian {
    pub fn new(width: f64) -> Result<Self> {
        if !(width > 0.0 && width.is_finite()) {
            return Err(Error::invalid_parameter(format!(
                "gaussian width must be positive, got {}",
                width
            )));
        }
        Ok(Self { width })
    }

    pub fn width(&self) -> f64 {
        self.width
    }
}

impl KernelFunction for Gaussian {
    const NAME: &'static str = "GaussianKernel";

    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        let diff = &x - &y;
        (-diff.dot(&diff) / self.width).exp()
    }
}

pub type GaussianKernel = Kernel<Gaussian>;

impl Kernel<Gaussian> {
    pub fn new(lhs: &RealFeatures, rhs: &RealFeatures, width: f64) -> Result<Self> {
        Self::with_function(Gaussian::new(width)?, lhs, rhs)
    }
}
