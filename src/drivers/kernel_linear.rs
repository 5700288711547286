use crate::toy::ToyData;
use crate::{KernelNormalizer, LinearKernel, Matrix, RealFeatures, Result};

pub const TITLE: &str = "Linear";

#[derive(Clone, Debug)]
pub struct LinearParams {
    pub train: Matrix,
    pub test: Matrix,
    pub scale: f64,
}

pub fn parameter_list(data: &ToyData) -> Vec<LinearParams> {
    [1.2, 1.4]
        .into_iter()
        .map(|scale| LinearParams {
            train: data.train_real.clone(),
            test: data.test_real.clone(),
            scale,
        })
        .collect()
}

/// Linear kernel with an average-diagonal normalizer fixed at `scale`.
pub fn run(params: &LinearParams) -> Result<(Matrix, Matrix, LinearKernel)> {
    let feats_train = RealFeatures::new(params.train.clone())?;
    let feats_test = RealFeatures::new(params.test.clone())?;

    let mut kernel = LinearKernel::new();
    kernel.set_normalizer(KernelNormalizer::AvgDiag { scale: params.scale })?;
    kernel.init(&feats_train, &feats_train)?;

    let km_train = kernel.kernel_matrix()?;
    kernel.init(&feats_train, &feats_test)?;
    let km_test = kernel.kernel_matrix()?;

    Ok((km_train, km_test, kernel))
}
