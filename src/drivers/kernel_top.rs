use crate::toy::ToyData;
use crate::{
    Alphabet, Error, Hmm, Labels, Matrix, PolyKernel, Result, StringCharFeatures, StringWordFeatures,
    TopFeatures, TrainingKind, Vector,
};

pub const TITLE: &str = "TOP Kernel";

/// Hidden states of each class model.
const N_STATES: usize = 1;

/// Arguments of the polynomial kernel applied to the TOP features.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolyArgs {
    pub degree: u32,
    pub inhomogeneous: bool,
    pub use_normalization: bool,
}

#[derive(Clone, Debug)]
pub struct TopParams {
    pub train: Vec<String>,
    pub test: Vec<String>,
    pub labels: Vector,
    pub pseudo: f64,
    pub order: usize,
    pub gap: usize,
    pub reverse: bool,
    pub poly: PolyArgs,
}

pub fn parameter_list(data: &ToyData) -> Vec<TopParams> {
    let params = TopParams {
        train: data.train_dna.clone(),
        test: data.test_dna.clone(),
        labels: data.train_labels_dna.clone(),
        pseudo: 1e-1,
        order: 1,
        gap: 0,
        reverse: false,
        poly: PolyArgs {
            degree: 1,
            inhomogeneous: false,
            use_normalization: true,
        },
    };
    vec![params.clone(), params]
}

fn word_features(sequences: Vec<String>, params: &TopParams) -> Result<StringWordFeatures> {
    let chars = StringCharFeatures::new(sequences, Alphabet::Dna)?;
    StringWordFeatures::obtain_from_char(&chars, params.order - 1, params.order, params.gap, params.reverse)
}

fn train_class_model(sequences: Vec<String>, params: &TopParams) -> Result<Hmm> {
    let words = word_features(sequences, params)?;
    let mut hmm = Hmm::new(&words, N_STATES, words.num_symbols(), params.pseudo)?;
    hmm.baum_welch_viterbi_train(TrainingKind::Normal)?;
    Ok(hmm)
}

/// Polynomial kernel over TOP features of a positive and a negative class HMM.
///
/// The class models are trained once on the labelled training sequences;
/// clones of them are bound to the test sequences for the second matrix.
pub fn run(params: &TopParams) -> Result<(Matrix, Matrix, PolyKernel)> {
    if params.order == 0 {
        return Err(Error::invalid_parameter("order must be at least 1"));
    }
    if params.labels.len() != params.train.len() {
        return Err(Error::dimension_mismatch(params.train.len(), params.labels.len()));
    }

    let (pos_idx, neg_idx) = Labels::binary(params.labels.clone())?.partition();
    let pick = |idx: &[usize]| idx.iter().map(|&i| params.train[i].clone()).collect::<Vec<_>>();
    let mut pos = train_class_model(pick(&pos_idx), params)?;
    let mut neg = train_class_model(pick(&neg_idx), params)?;

    let words_train = word_features(params.train.clone(), params)?;
    let words_test = word_features(params.test.clone(), params)?;

    pos.set_observations(&words_train)?;
    neg.set_observations(&words_train)?;
    let feats_train = TopFeatures::new(&pos, &neg)?.into_real();
    let PolyArgs { degree, inhomogeneous, use_normalization } = params.poly;
    let mut kernel = PolyKernel::new(&feats_train, &feats_train, degree, inhomogeneous, use_normalization)?;
    let km_train = kernel.kernel_matrix()?;

    let mut pos_clone = pos.clone();
    let mut neg_clone = neg.clone();
    pos_clone.set_observations(&words_test)?;
    neg_clone.set_observations(&words_test)?;
    let feats_test = TopFeatures::new(&pos_clone, &neg_clone)?.into_real();
    kernel.init(&feats_train, &feats_test)?;
    let km_test = kernel.kernel_matrix()?;

    Ok((km_train, km_test, kernel))
}
