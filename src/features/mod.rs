//! Feature containers consumed by distances, kernels and models.
//!
//! - `RealFeatures`: dense real vectors, one per row
//! - `StringCharFeatures`: symbol sequences over an [`Alphabet`]
//! - `StringWordFeatures`: sequences of packed k-mer words derived from char features
//! - `Labels`: real-valued targets, optionally restricted to `±1`
//!
//! # Examples
//!
//! ```rust
//! use kernelkit::{Alphabet, RealFeatures, StringCharFeatures, StringWordFeatures};
//! use ndarray::array;
//!
//! let real = RealFeatures::new(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! assert_eq!(real.num_vectors(), 2);
//!
//! let chars = StringCharFeatures::new(vec!["ACGT".to_string()], Alphabet::Dna).unwrap();
//! let words = StringWordFeatures::obtain_from_char(&chars, 0, 1, 0, false).unwrap();
//! assert_eq!(words.sequence(0), &[0, 1, 2, 3]);
//! ```

mod real;
mod string;
mod labels;

pub use real::RealFeatures;
pub use string::{Alphabet, StringCharFeatures, StringWordFeatures};
pub use labels::Labels;
