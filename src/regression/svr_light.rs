use crate::kernel::{Kernel, KernelFunction};
use crate::{Error, Labels, RealFeatures, Result, Vector};
use log::warn;

#[cfg(feature = "svrlight")]
use super::solver::EpsilonSvr;
#[cfg(feature = "svrlight")]
use log::{debug, info};

/// Epsilon-insensitive support vector regression.
///
/// The kernel has to be bound `train x train` at construction. After
/// [`train`](Self::train), rebind it to `train x test` through
/// [`kernel_mut`](Self::kernel_mut) and call [`apply`](Self::apply).
#[derive(Clone, Debug)]
pub struct SvrLight<F: KernelFunction> {
    pub coefficients: Option<Vector>,
    pub bias: Option<f64>,
    c: f64,
    epsilon: f64,
    tube_epsilon: f64,
    num_threads: usize,
    max_iter: usize,
    kernel: Kernel<F>,
    labels: Labels,
    train_features: RealFeatures,
}

impl<F: KernelFunction> SvrLight<F> {
    /// `c` bounds every dual coefficient; `epsilon` is the solver's stopping
    /// tolerance on the KKT gap.
    pub fn new(c: f64, epsilon: f64, kernel: Kernel<F>, labels: Labels) -> Result<Self> {
        if !(c > 0.0 && c.is_finite()) {
            return Err(Error::invalid_parameter(format!("C must be positive, got {}", c)));
        }
        if !(epsilon > 0.0 && epsilon.is_finite()) {
            return Err(Error::invalid_parameter(format!(
                "epsilon must be positive, got {}",
                epsilon
            )));
        }

        let (lhs, rhs) = match (kernel.lhs(), kernel.rhs()) {
            (Some(lhs), Some(rhs)) => (lhs, rhs),
            _ => return Err(Error::NotInitialized(F::NAME)),
        };
        if !lhs.same_as(rhs) {
            return Err(Error::invalid_parameter(
                "SVR kernel must be bound to the training features on both sides",
            ));
        }
        if lhs.num_vectors() != labels.len() {
            return Err(Error::dimension_mismatch(lhs.num_vectors(), labels.len()));
        }
        let train_features = lhs.clone();

        Ok(Self {
            coefficients: None,
            bias: None,
            c,
            epsilon,
            tube_epsilon: 1e-2,
            num_threads: 1,
            max_iter: 100_000,
            kernel,
            labels,
            train_features,
        })
    }

    /// Half-width of the loss-free tube around the targets.
    pub fn set_tube_epsilon(&mut self, tube_epsilon: f64) {
        if tube_epsilon < 0.0 {
            panic!("tube_epsilon must be non-negative, got {}", tube_epsilon);
        }
        self.tube_epsilon = tube_epsilon;
    }

    /// Parallelism hint. The solver itself runs on the calling thread.
    pub fn set_num_threads(&mut self, num_threads: usize) {
        if num_threads == 0 {
            panic!("num_threads must be > 0, got {}", num_threads);
        }
        self.num_threads = num_threads;
    }

    pub fn set_max_iter(&mut self, max_iter: usize) {
        if max_iter == 0 {
            panic!("max_iter must be > 0, got {}", max_iter);
        }
        self.max_iter = max_iter;
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn tube_epsilon(&self) -> f64 {
        self.tube_epsilon
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn kernel(&self) -> &Kernel<F> {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut Kernel<F> {
        &mut self.kernel
    }

    pub fn into_kernel(self) -> Kernel<F> {
        self.kernel
    }

    pub fn is_trained(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Training samples with a non-zero coefficient.
    pub fn n_support_vectors(&self) -> Option<usize> {
        self.coefficients
            .as_ref()
            .map(|coef| coef.iter().filter(|c| c.abs() > 1e-8).count())
    }

    #[cfg(feature = "svrlight")]
    pub fn train(&mut self) -> Result<()> {
        debug!(
            "SVRLight training: C={}, epsilon={}, tube_epsilon={}, num_threads={}",
            self.c, self.epsilon, self.tube_epsilon, self.num_threads
        );

        // Gram matrix on a private copy so the caller's binding is left alone.
        let mut gram_kernel = self.kernel.clone();
        gram_kernel.init(&self.train_features, &self.train_features)?;
        let gram = gram_kernel.kernel_matrix()?;

        let solution = EpsilonSvr::new(
            &gram,
            self.labels.get_labels(),
            self.c,
            self.tube_epsilon,
            self.epsilon,
            self.max_iter,
        )?
        .solve()?;

        self.coefficients = Some(solution.coefficients);
        self.bias = Some(solution.bias);
        info!(
            "SVRLight trained in {} iterations, {} support vectors",
            solution.iterations,
            self.n_support_vectors().unwrap_or(0)
        );
        Ok(())
    }

    #[cfg(not(feature = "svrlight"))]
    pub fn train(&mut self) -> Result<()> {
        warn!("SVRLight solver not compiled in; enable the `svrlight` feature");
        Err(Error::BackendUnavailable("SVRLight"))
    }

    /// Predictions for every rhs vector of the kernel's current binding.
    pub fn apply(&mut self) -> Result<Labels> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(Error::NotTrained("SVRLight"))?;
        let bias = self.bias.unwrap_or(0.0);

        match self.kernel.lhs() {
            Some(lhs) if lhs.same_as(&self.train_features) => {}
            Some(_) => {
                warn!("SVRLight kernel lhs is not the training set");
                return Err(Error::invalid_parameter(
                    "kernel lhs must be the training features; rebind with init(train, test)",
                ));
            }
            None => return Err(Error::NotInitialized(F::NAME)),
        }

        let km = self.kernel.kernel_matrix()?;
        let predictions = km.t().dot(coefficients) + bias;
        Labels::new(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GaussianKernel, LinearKernel};
    use ndarray::array;

    fn setup() -> (RealFeatures, RealFeatures, Labels) {
        let train = RealFeatures::new(array![[0.0], [1.0], [2.0], [3.0], [4.0]]).unwrap();
        let test = RealFeatures::new(array![[0.5], [2.5]]).unwrap();
        let labels = Labels::new(array![1.0, 3.0, 5.0, 7.0, 9.0]).unwrap();
        (train, test, labels)
    }

    #[test]
    fn test_svr_new_validates() {
        let (train, test, labels) = setup();
        let kernel = LinearKernel::with_features(&train, &train).unwrap();
        assert!(SvrLight::new(0.0, 1e-5, kernel.clone(), labels.clone()).is_err());
        assert!(SvrLight::new(1.0, 0.0, kernel, labels.clone()).is_err());

        let unbound = LinearKernel::new();
        assert_eq!(
            SvrLight::new(1.0, 1e-5, unbound, labels.clone()).unwrap_err(),
            Error::NotInitialized("LinearKernel")
        );

        let rebound = LinearKernel::with_features(&train, &test).unwrap();
        assert!(SvrLight::new(1.0, 1e-5, rebound, labels).is_err());

        let short = Labels::new(array![1.0, 2.0]).unwrap();
        let kernel = LinearKernel::with_features(&train, &train).unwrap();
        assert_eq!(
            SvrLight::new(1.0, 1e-5, kernel, short).unwrap_err(),
            Error::dimension_mismatch(5, 2)
        );
    }

    #[test]
    fn test_apply_before_train() {
        let (train, _, labels) = setup();
        let kernel = LinearKernel::with_features(&train, &train).unwrap();
        let mut svr = SvrLight::new(1.0, 1e-5, kernel, labels).unwrap();
        assert_eq!(svr.apply().unwrap_err(), Error::NotTrained("SVRLight"));
    }

    #[test]
    #[should_panic]
    fn test_negative_tube_epsilon() {
        let (train, _, labels) = setup();
        let kernel = LinearKernel::with_features(&train, &train).unwrap();
        let mut svr = SvrLight::new(1.0, 1e-5, kernel, labels).unwrap();
        svr.set_tube_epsilon(-1.0);
    }

    #[cfg(feature = "svrlight")]
    #[test]
    fn test_linear_svr_predicts_line() {
        let (train, test, labels) = setup();
        let kernel = LinearKernel::with_features(&train, &train).unwrap();
        let mut svr = SvrLight::new(100.0, 1e-6, kernel, labels).unwrap();
        svr.set_tube_epsilon(0.1);
        svr.set_num_threads(3);
        svr.train().unwrap();
        assert!(svr.is_trained());

        svr.kernel_mut().init(&train, &test).unwrap();
        let out = svr.apply().unwrap();
        assert_eq!(out.len(), 2);
        // y = 2x + 1
        assert!((out.get_labels()[0] - 2.0).abs() < 0.2);
        assert!((out.get_labels()[1] - 6.0).abs() < 0.2);
    }

    #[cfg(feature = "svrlight")]
    #[test]
    fn test_train_leaves_kernel_binding() {
        let (train, test, labels) = setup();
        let kernel = GaussianKernel::new(&train, &train, 1.2).unwrap();
        let mut svr = SvrLight::new(1.0, 1e-5, kernel, labels).unwrap();
        svr.kernel_mut().init(&train, &test).unwrap();
        svr.train().unwrap();
        assert_eq!(svr.kernel().num_rhs(), 2);

        let out = svr.apply().unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.get_labels().iter().all(|v| v.is_finite()));
    }

    #[cfg(feature = "svrlight")]
    #[test]
    fn test_apply_rejects_foreign_lhs() {
        let (train, test, labels) = setup();
        let kernel = LinearKernel::with_features(&train, &train).unwrap();
        let mut svr = SvrLight::new(10.0, 1e-5, kernel, labels).unwrap();
        svr.train().unwrap();
        svr.kernel_mut().init(&test, &test).unwrap();
        assert!(svr.apply().is_err());
    }

    #[cfg(not(feature = "svrlight"))]
    #[test]
    fn test_train_without_backend() {
        let (train, _, labels) = setup();
        let kernel = LinearKernel::with_features(&train, &train).unwrap();
        let mut svr = SvrLight::new(1.0, 1e-5, kernel, labels).unwrap();
        assert_eq!(svr.train().unwrap_err(), Error::BackendUnavailable("SVRLight"));
        assert!(!svr.is_trained());
    }
}
