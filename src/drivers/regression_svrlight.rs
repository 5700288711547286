use crate::toy::ToyData;
use crate::{Error, Gaussian, GaussianKernel, Labels, Matrix, RealFeatures, Result, SvrLight, Vector};
use log::warn;

pub const TITLE: &str = "SVRLight";

#[derive(Clone, Debug)]
pub struct SvrParams {
    pub train: Matrix,
    pub test: Matrix,
    pub labels: Vector,
    pub width: f64,
    pub c: f64,
    pub epsilon: f64,
    pub tube_epsilon: f64,
    pub num_threads: usize,
}

pub fn parameter_list(data: &ToyData) -> Vec<SvrParams> {
    [(1.2, 1.0, 1e-5, 1e-2, 1), (2.3, 0.5, 1e-5, 1e-6, 1)]
        .into_iter()
        .map(|(width, c, epsilon, tube_epsilon, num_threads)| SvrParams {
            train: data.train_real.clone(),
            test: data.test_real.clone(),
            labels: data.train_labels_twoclass.clone(),
            width,
            c,
            epsilon,
            tube_epsilon,
            num_threads,
        })
        .collect()
}

/// Gaussian-kernel SVR trained on `train`, applied to `test`.
///
/// Returns `Ok(None)` after printing a notice when the solver backend is not
/// compiled in.
pub fn run(params: &SvrParams) -> Result<Option<(Labels, GaussianKernel)>> {
    let feats_train = RealFeatures::new(params.train.clone())?;
    let feats_test = RealFeatures::new(params.test.clone())?;
    let mut svr = configured_svr(params, &feats_train)?;

    match svr.train() {
        Ok(()) => {}
        Err(err @ Error::BackendUnavailable(_)) => {
            warn!("{}", err);
            println!("{}", err);
            return Ok(None);
        }
        Err(err) => return Err(err),
    }

    svr.kernel_mut().init(&feats_train, &feats_test)?;
    let out = svr.apply()?;

    Ok(Some((out, svr.into_kernel())))
}

/// Predictions of the model `run` trains, evaluated on its own training set.
pub fn training_fit(params: &SvrParams) -> Result<Labels> {
    let feats_train = RealFeatures::new(params.train.clone())?;
    let mut svr = configured_svr(params, &feats_train)?;
    svr.train()?;
    svr.apply()
}

fn configured_svr(params: &SvrParams, feats_train: &RealFeatures) -> Result<SvrLight<Gaussian>> {
    let kernel = GaussianKernel::new(feats_train, feats_train, params.width)?;
    let labels = Labels::new(params.labels.clone())?;

    let mut svr = SvrLight::new(params.c, params.epsilon, kernel, labels)?;
    svr.set_tube_epsilon(params.tube_epsilon);
    svr.set_num_threads(params.num_threads);
    Ok(svr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn params() -> SvrParams {
        SvrParams {
            train: array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [0.5, 0.5]],
            test: array![[0.1, 0.1], [0.9, 0.2]],
            labels: array![-1.0, 1.0, 1.0, -1.0, 1.0],
            width: 1.2,
            c: 1.0,
            epsilon: 1e-5,
            tube_epsilon: 1e-2,
            num_threads: 3,
        }
    }

    #[cfg(feature = "svrlight")]
    #[test]
    fn test_predictions_for_test_set() {
        let (out, kernel) = run(&params()).unwrap().unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.get_labels().iter().all(|v| v.is_finite()));
        assert_eq!(kernel.num_lhs(), 5);
        assert_eq!(kernel.num_rhs(), 2);
    }

    #[cfg(feature = "svrlight")]
    #[test]
    fn test_canned_parameters() {
        let data = ToyData::generate(5);
        for p in parameter_list(&data) {
            let (out, _) = run(&p).unwrap().unwrap();
            assert_eq!(out.len(), data.test_real.nrows());
        }
    }

    #[cfg(feature = "svrlight")]
    #[test]
    fn test_training_fit_uses_tube_epsilon() {
        let mut wide = params();
        wide.tube_epsilon = 10.0;
        let flat = training_fit(&wide).unwrap();
        let first = flat.get_labels()[0];
        assert!(flat.get_labels().iter().all(|&v| (v - first).abs() < 1e-12));

        let mut narrow = params();
        narrow.c = 100.0;
        let fit = training_fit(&narrow).unwrap();
        assert_eq!(fit.len(), 5);
        let spread = fit.get_labels().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
            - fit.get_labels().fold(f64::INFINITY, |a, &b| a.min(b));
        assert!(spread > 0.5);
    }

    #[cfg(not(feature = "svrlight"))]
    #[test]
    fn test_backend_absent_is_soft_failure() {
        assert!(run(&params()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_width_fails() {
        let mut p = params();
        p.width = 0.0;
        assert!(run(&p).is_err());
    }
}
