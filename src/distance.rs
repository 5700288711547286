//! Pairwise distances between two bound [`RealFeatures`].
//!
//! ```rust
//! use kernelkit::{EuclideanDistance, RealFeatures};
//! use ndarray::array;
//!
//! let train = RealFeatures::new(array![[0.0, 0.0], [3.0, 4.0]]).unwrap();
//! let mut distance = EuclideanDistance::new(&train, &train).unwrap();
//! let dm = distance.distance_matrix().unwrap();
//! assert_eq!(dm[[0, 1]], 5.0);
//! ```

use crate::kernel::ComputationState;
use crate::{Error, Matrix, RealFeatures, Result};
use log::debug;

#[derive(Clone, Debug)]
pub struct EuclideanDistance {
    lhs: RealFeatures,
    rhs: RealFeatures,
    disable_sqrt: bool,
    state: ComputationState,
}

impl EuclideanDistance {
    pub fn new(lhs: &RealFeatures, rhs: &RealFeatures) -> Result<Self> {
        check_dimensions(lhs, rhs)?;
        Ok(Self {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
            disable_sqrt: false,
            state: ComputationState::Bound,
        })
    }

    /// Skip the final square root, yielding squared Euclidean distances.
    pub fn set_disable_sqrt(&mut self, disable_sqrt: bool) {
        self.disable_sqrt = disable_sqrt;
    }

    pub fn disable_sqrt(&self) -> bool {
        self.disable_sqrt
    }

    /// Rebinds both operands.
    pub fn init(&mut self, lhs: &RealFeatures, rhs: &RealFeatures) -> Result<()> {
        check_dimensions(lhs, rhs)?;
        self.lhs = lhs.clone();
        self.rhs = rhs.clone();
        self.state = ComputationState::Bound;
        debug!(
            "EuclideanDistance bound to {}x{} vectors",
            lhs.num_vectors(),
            rhs.num_vectors()
        );
        Ok(())
    }

    pub fn num_lhs(&self) -> usize {
        self.lhs.num_vectors()
    }

    pub fn num_rhs(&self) -> usize {
        self.rhs.num_vectors()
    }

    pub fn state(&self) -> ComputationState {
        self.state
    }

    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        if i >= self.num_lhs() || j >= self.num_rhs() {
            return Err(Error::invalid_parameter(format!(
                "distance index ({}, {}) out of range for {}x{}",
                i,
                j,
                self.num_lhs(),
                self.num_rhs()
            )));
        }
        Ok(self.entry(i, j))
    }

    fn entry(&self, i: usize, j: usize) -> f64 {
        let diff = &self.lhs.vector(i) - &self.rhs.vector(j);
        let squared = diff.dot(&diff);
        if self.disable_sqrt { squared } else { squared.sqrt() }
    }

    /// `num_lhs x num_rhs` distances for the current pair.
    pub fn distance_matrix(&mut self) -> Result<Matrix> {
        let symmetric = self.lhs.same_as(&self.rhs);
        let (n, m) = (self.num_lhs(), self.num_rhs());
        let mut dm = Matrix::zeros((n, m));

        for i in 0..n {
            let from = if symmetric { i } else { 0 };
            for j in from..m {
                let d = self.entry(i, j);
                dm[[i, j]] = d;
                if symmetric {
                    dm[[j, i]] = d;
                }
            }
        }

        self.state = ComputationState::Evaluated;
        debug!("EuclideanDistance computed {}x{} matrix", n, m);
        Ok(dm)
    }
}

fn check_dimensions(lhs: &RealFeatures, rhs: &RealFeatures) -> Result<()> {
    if lhs.num_features() != rhs.num_features() {
        return Err(Error::dimension_mismatch(lhs.num_features(), rhs.num_features()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn train() -> RealFeatures {
        RealFeatures::new(array![[1.0, 2.0], [4.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_norm_squared_train_matrix() {
        let feats = train();
        let mut distance = EuclideanDistance::new(&feats, &feats).unwrap();
        distance.set_disable_sqrt(true);

        let dm = distance.distance_matrix().unwrap();
        assert_eq!(dm.shape(), &[2, 2]);
        assert_eq!(dm[[0, 0]], 0.0);
        assert_eq!(dm[[1, 1]], 0.0);
        assert!((dm[[0, 1]] - 25.0).abs() < 1e-10);
        assert_eq!(dm, dm.t());
    }

    #[test]
    fn test_sqrt_distance() {
        let feats = train();
        let mut distance = EuclideanDistance::new(&feats, &feats).unwrap();
        let dm = distance.distance_matrix().unwrap();
        assert!((dm[[1, 0]] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rebind_to_test_set() {
        let feats_train = train();
        let feats_test = RealFeatures::new(array![[1.0, 2.0], [0.0, 0.0], [2.0, 2.0]]).unwrap();
        let mut distance = EuclideanDistance::new(&feats_train, &feats_train).unwrap();
        distance.set_disable_sqrt(true);

        let dm_train = distance.distance_matrix().unwrap();
        let snapshot = dm_train.clone();
        distance.init(&feats_train, &feats_test).unwrap();
        assert_eq!(distance.state(), ComputationState::Bound);

        let dm_test = distance.distance_matrix().unwrap();
        assert_eq!(distance.state(), ComputationState::Evaluated);
        assert_eq!(dm_test.shape(), &[2, 3]);
        assert!((dm_test[[0, 1]] - 5.0).abs() < 1e-10);
        assert!((dm_test[[1, 2]] - 20.0).abs() < 1e-10);
        assert_eq!(dm_train, snapshot);
    }

    #[test]
    fn test_distance_index_out_of_range() {
        let feats = train();
        let distance = EuclideanDistance::new(&feats, &feats).unwrap();
        assert!((distance.distance(0, 1).unwrap() - 5.0).abs() < 1e-10);
        assert!(distance.distance(2, 0).is_err());
        assert!(distance.distance(0, 2).is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = train();
        let b = RealFeatures::new(array![[1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(
            EuclideanDistance::new(&a, &b).unwrap_err(),
            Error::dimension_mismatch(2, 3)
        );
        let mut distance = EuclideanDistance::new(&a, &a).unwrap();
        assert!(distance.init(&a, &b).is_err());
    }
}
