use super::{Kernel, KernelFunction};
use crate::{RealFeatures, Result};
use ndarray::ArrayView1;

/// `k(x, y) = x·y`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Linear;

impl KernelFunction for Linear {
    const NAME: &'static str = "LinearKernel";

    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        x.dot(&y)
    }
}

pub type LinearKernel = Kernel<Linear>;

impl Kernel<Linear> {
    pub fn new() -> Self {
        Self::from_function(Linear)
    }

    pub fn with_features(lhs: &RealFeatures, rhs: &RealFeatures) -> Result<Self> {
        Self::with_function(Linear, lhs, rhs)
    }
}

impl Default for Kernel<Linear> {
    fn default() -> Self {
        Self::new()
    }
}
