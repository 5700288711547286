//! Seeded toy datasets for the drivers in [`crate::drivers`].

use crate::{Matrix, Vector};
use ndarray::Array;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DNA_SYMBOLS: [char; 4] = ['A', 'C', 'G', 'T'];

/// Uniform values in `[-1, 1)`, one row per sample.
pub fn real_matrix(n_samples: usize, n_features: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    Array::random_using((n_samples, n_features), Uniform::new(-1.0, 1.0), &mut rng)
}

/// `+1`/`-1` labels from the sign of an alternating-sign projection of each row.
pub fn twoclass_labels(features: &Matrix) -> Vector {
    let weights = Array::from_shape_fn(features.ncols(), |j| if j % 2 == 0 { 1.0 } else { -1.0 });
    features
        .dot(&weights)
        .mapv(|score| if score >= 0.0 { 1.0 } else { -1.0 })
}

/// Random ACGT strings of a fixed length.
pub fn dna_sequences(n: usize, len: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            (0..len)
                .map(|_| DNA_SYMBOLS[rng.gen_range(0..DNA_SYMBOLS.len())])
                .collect()
        })
        .collect()
}

/// `+1` when at least half of a sequence is G or C, `-1` otherwise.
pub fn dna_labels(sequences: &[String]) -> Vector {
    sequences
        .iter()
        .map(|s| {
            let gc = s.chars().filter(|c| matches!(c, 'G' | 'C' | 'g' | 'c')).count();
            if 2 * gc >= s.len() { 1.0 } else { -1.0 }
        })
        .collect()
}

/// Everything the four drivers consume, generated from one seed.
#[derive(Clone, Debug)]
pub struct ToyData {
    pub train_real: Matrix,
    pub test_real: Matrix,
    pub train_labels_twoclass: Vector,
    pub train_dna: Vec<String>,
    pub test_dna: Vec<String>,
    pub train_labels_dna: Vector,
}

impl ToyData {
    pub fn generate(seed: u64) -> Self {
        let train_real = real_matrix(12, 2, seed);
        let test_real = real_matrix(8, 2, seed.wrapping_add(1));
        let train_labels_twoclass = twoclass_labels(&train_real);

        let mut train_dna = dna_sequences(10, 24, seed.wrapping_add(2));
        // Force both classes so each class HMM has sequences to train on.
        train_dna[0] = "GCGCGGCCGCGCGGCCAAGCGCGC".to_string();
        train_dna[1] = "ATATTAATATATTTAAGCATATAT".to_string();
        let test_dna = dna_sequences(6, 24, seed.wrapping_add(3));
        let train_labels_dna = dna_labels(&train_dna);

        Self {
            train_real,
            test_real,
            train_labels_twoclass,
            train_dna,
            test_dna,
            train_labels_dna,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_real_matrix_is_seeded() {
        let a = real_matrix(4, 3, 7);
        let b = real_matrix(4, 3, 7);
        assert_eq!(a, b);
        assert_eq!(a.shape(), &[4, 3]);
        assert!(a.iter().all(|&v| (-1.0..1.0).contains(&v)));
    }

    #[test]
    fn test_twoclass_labels() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]];
        assert_eq!(twoclass_labels(&x), array![1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_dna_labels() {
        let seqs = vec!["GGCA".to_string(), "ATAC".to_string()];
        assert_eq!(dna_labels(&seqs), array![1.0, -1.0]);
    }

    #[test]
    fn test_toy_data_has_both_dna_classes() {
        let data = ToyData::generate(42);
        assert!(data.train_labels_dna.iter().any(|&y| y == 1.0));
        assert!(data.train_labels_dna.iter().any(|&y| y == -1.0));
        assert_eq!(data.train_dna.len(), data.train_labels_dna.len());
        assert!(data.test_dna.iter().all(|s| s.len() == 24));
    }
}
