use crate::{Error, Matrix, Result};
use ndarray::ArrayView1;
use std::sync::Arc;

/// Dense real-valued feature vectors. Rows are vectors.
///
/// The matrix is shared, so clones are cheap and every holder sees the same
/// immutable data.
#[derive(Clone, Debug)]
pub struct RealFeatures {
    matrix: Arc<Matrix>,
}

impl RealFeatures {
    pub fn new(matrix: Matrix) -> Result<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(Error::empty_input(format!(
                "real features need at least one vector and one dimension, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }

        Ok(Self { matrix: Arc::new(matrix) })
    }

    /// Builds from nested rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_features = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| Error::empty_input("real features need at least one vector"))?;

        for (row, values) in rows.iter().enumerate() {
            if values.len() != n_features {
                return Err(Error::RaggedRows {
                    row,
                    expected: n_features,
                    actual: values.len(),
                });
            }
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let n_vectors = flat.len() / n_features.max(1);
        let matrix = Matrix::from_shape_vec((n_vectors, n_features), flat)
            .map_err(|e| Error::invalid_parameter(e.to_string()))?;
        Self::new(matrix)
    }

    pub fn num_vectors(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn num_features(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn vector(&self, i: usize) -> ArrayView1<'_, f64> {
        self.matrix.row(i)
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// True when both handles wrap the very same storage.
    pub fn same_as(&self, other: &RealFeatures) -> bool {
        Arc::ptr_eq(&self.matrix, &other.matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_real_features_creation() {
        let feats = RealFeatures::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(feats.num_vectors(), 2);
        assert_eq!(feats.num_features(), 3);
        assert_eq!(feats.vector(1), array![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_real_features_empty() {
        assert!(matches!(
            RealFeatures::new(Matrix::zeros((0, 3))),
            Err(Error::EmptyInput(_))
        ));
        assert!(matches!(RealFeatures::from_rows(vec![]), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_real_features_ragged_rows() {
        let err = RealFeatures::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err, Error::RaggedRows { row: 1, expected: 2, actual: 1 });
    }

    #[test]
    fn test_clone_shares_storage() {
        let a = RealFeatures::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
        let b = a.clone();
        let c = RealFeatures::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
    }
}
