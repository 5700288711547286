//! Discrete hidden Markov models over [`StringWordFeatures`](crate::StringWordFeatures)
//! and the TOP features derived from a pair of them.
//!
//! All inference runs in log-space. Trained parameters live in an immutable
//! [`HmmParameters`] shared between clones; the observations a model is bound
//! to are per-instance, so a clone can be pointed at held-out sequences
//! without touching the original.
//!
//! # Examples
//!
//! ```rust
//! use kernelkit::{Alphabet, Hmm, StringCharFeatures, StringWordFeatures, TrainingKind};
//!
//! let chars = StringCharFeatures::new(
//!     vec!["ACGTACGT".to_string(), "AACCGGTT".to_string()],
//!     Alphabet::Dna,
//! ).unwrap();
//! let words = StringWordFeatures::obtain_from_char(&chars, 0, 1, 0, false).unwrap();
//!
//! let mut hmm = Hmm::new(&words, 1, 4, 0.1).unwrap();
//! hmm.baum_welch_viterbi_train(TrainingKind::Normal).unwrap();
//!
//! let clone = hmm.clone();
//! assert!(clone.shares_parameters_with(&hmm));
//! let ll = hmm.log_likelihood(words.sequence(0)).unwrap();
//! assert!(ll < 0.0);
//! ```

mod model;
mod train;
mod top;

pub use model::{Hmm, HmmParameters};
pub use train::TrainingKind;
pub use top::TopFeatures;

/// `log(exp(a) + exp(b))`, tolerating negative infinity on either side.
fn log_sum_exp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let max = a.max(b);
    max + ((a - max).exp() + (b - max).exp()).ln()
}

fn log_sum_exp_iter(xs: impl Iterator<Item = f64>) -> f64 {
    xs.fold(f64::NEG_INFINITY, log_sum_exp)
}
