use crate::toy::ToyData;
use crate::{EuclideanDistance, Matrix, RealFeatures, Result};

pub const TITLE: &str = "EuclidianDistance - NormSquared";

#[derive(Clone, Debug)]
pub struct DistanceParams {
    pub train: Matrix,
    pub test: Matrix,
}

pub fn parameter_list(data: &ToyData) -> Vec<DistanceParams> {
    let params = DistanceParams {
        train: data.train_real.clone(),
        test: data.test_real.clone(),
    };
    vec![params.clone(), params]
}

/// Squared Euclidean distances, train x train then train x test.
pub fn run(params: &DistanceParams) -> Result<(EuclideanDistance, Matrix, Matrix)> {
    let feats_train = RealFeatures::new(params.train.clone())?;
    let feats_test = RealFeatures::new(params.test.clone())?;

    let mut distance = EuclideanDistance::new(&feats_train, &feats_train)?;
    distance.set_disable_sqrt(true);

    let dm_train = distance.distance_matrix()?;
    distance.init(&feats_train, &feats_test)?;
    let dm_test = distance.distance_matrix()?;

    Ok((distance, dm_train, dm_test))
}
