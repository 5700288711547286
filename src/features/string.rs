use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Symbol set of a string feature container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alphabet {
    /// A, C, G, T in that order. Lowercase input is accepted.
    Dna,
}

impl Alphabet {
    pub fn size(&self) -> usize {
        match self {
            Alphabet::Dna => 4,
        }
    }

    pub fn index_of(&self, symbol: char) -> Option<u8> {
        match self {
            Alphabet::Dna => match symbol.to_ascii_uppercase() {
                'A' => Some(0),
                'C' => Some(1),
                'G' => Some(2),
                'T' => Some(3),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alphabet::Dna => write!(f, "DNA"),
        }
    }
}

/// Symbol sequences encoded as alphabet indices.
#[derive(Clone, Debug)]
pub struct StringCharFeatures {
    alphabet: Alphabet,
    sequences: Arc<Vec<Vec<u8>>>,
}

impl StringCharFeatures {
    pub fn new(sequences: Vec<String>, alphabet: Alphabet) -> Result<Self> {
        if sequences.is_empty() {
            return Err(Error::empty_input("string features need at least one sequence"));
        }

        let mut encoded = Vec::with_capacity(sequences.len());
        for (i, seq) in sequences.iter().enumerate() {
            if seq.is_empty() {
                return Err(Error::empty_input(format!("sequence {} is empty", i)));
            }
            let symbols = seq
                .chars()
                .enumerate()
                .map(|(position, symbol)| {
                    alphabet.index_of(symbol).ok_or(Error::InvalidSymbol {
                        sequence: i,
                        position,
                        symbol,
                    })
                })
                .collect::<Result<Vec<u8>>>()?;
            encoded.push(symbols);
        }

        Ok(Self {
            alphabet,
            sequences: Arc::new(encoded),
        })
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn num_vectors(&self) -> usize {
        self.sequences.len()
    }

    pub fn sequence(&self, i: usize) -> &[u8] {
        &self.sequences[i]
    }
}

/// Sequences of k-mer words packed into integers in `0..num_symbols()`.
#[derive(Clone, Debug)]
pub struct StringWordFeatures {
    alphabet: Alphabet,
    order: usize,
    sequences: Arc<Vec<Vec<usize>>>,
}

impl StringWordFeatures {
    /// Packs `order` symbols per word, base `alphabet.size()`.
    ///
    /// The window of a word spans `order + gap` symbols; the `gap` symbols after
    /// the first `order / 2` are skipped. The first word ends at
    /// `max(start, order + gap - 1)`. With `reverse` the last symbol of a word
    /// is its most significant digit.
    pub fn obtain_from_char(
        chars: &StringCharFeatures,
        start: usize,
        order: usize,
        gap: usize,
        reverse: bool,
    ) -> Result<Self> {
        if order == 0 {
            return Err(Error::invalid_parameter("order must be at least 1"));
        }

        let base = chars.alphabet().size();
        if u32::try_from(order).ok().and_then(|o| base.checked_pow(o)).is_none() {
            return Err(Error::invalid_parameter(format!(
                "order {} is too large: {}^{} words do not fit in usize",
                order, base, order
            )));
        }
        let width = order + gap;
        let first_end = start.max(width - 1);
        let head = order / 2;

        let mut sequences = Vec::with_capacity(chars.num_vectors());
        for i in 0..chars.num_vectors() {
            let symbols = chars.sequence(i);
            if symbols.len() <= first_end {
                return Err(Error::invalid_parameter(format!(
                    "sequence {} has {} symbols, need more than {} to form a word",
                    i,
                    symbols.len(),
                    first_end
                )));
            }

            let words = (first_end..symbols.len())
                .map(|end| {
                    let window = &symbols[end + 1 - width..=end];
                    let digits = window[..head].iter().chain(window[head + gap..].iter());
                    if reverse {
                        digits.rev().fold(0, |word, &s| word * base + s as usize)
                    } else {
                        digits.fold(0, |word, &s| word * base + s as usize)
                    }
                })
                .collect();
            sequences.push(words);
        }

        Ok(Self {
            alphabet: chars.alphabet(),
            order,
            sequences: Arc::new(sequences),
        })
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn num_symbols(&self) -> usize {
        self.alphabet.size().pow(self.order as u32)
    }

    pub fn num_vectors(&self) -> usize {
        self.sequences.len()
    }

    pub fn sequence(&self, i: usize) -> &[usize] {
        &self.sequences[i]
    }

    pub fn sequences(&self) -> impl Iterator<Item = &[usize]> {
        self.sequences.iter().map(Vec::as_slice)
    }

    /// Fails unless both containers encode words the same way.
    pub fn check_compatible(&self, other: &StringWordFeatures) -> Result<()> {
        if self.alphabet != other.alphabet || self.order != other.order {
            return Err(Error::AlphabetMismatch(format!(
                "{} words of order {} vs {} words of order {}",
                self.alphabet, self.order, other.alphabet, other.order
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(seqs: &[&str]) -> StringCharFeatures {
        StringCharFeatures::new(seqs.iter().map(|s| s.to_string()).collect(), Alphabet::Dna).unwrap()
    }

    #[test]
    fn test_dna_encoding() {
        let feats = chars(&["ACGT", "tgca"]);
        assert_eq!(feats.num_vectors(), 2);
        assert_eq!(feats.sequence(0), &[0, 1, 2, 3]);
        assert_eq!(feats.sequence(1), &[3, 2, 1, 0]);
    }

    #[test]
    fn test_invalid_symbol() {
        let err = StringCharFeatures::new(vec!["ACXT".to_string()], Alphabet::Dna).unwrap_err();
        assert_eq!(err, Error::InvalidSymbol { sequence: 0, position: 2, symbol: 'X' });
    }

    #[test]
    fn test_empty_inputs() {
        assert!(StringCharFeatures::new(vec![], Alphabet::Dna).is_err());
        assert!(StringCharFeatures::new(vec!["AC".to_string(), String::new()], Alphabet::Dna).is_err());
    }

    #[test]
    fn test_order_too_large_for_words() {
        let long = "ACGT".repeat(10);
        let feats = chars(&[long.as_str()]);
        let err = StringWordFeatures::obtain_from_char(&feats, 0, 32, 0, false).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(msg) if msg.contains("too large")));
        assert!(StringWordFeatures::obtain_from_char(&feats, 0, 8, 0, false).is_ok());
    }

    #[test]
    fn test_order_one_words_are_symbols() {
        let words = StringWordFeatures::obtain_from_char(&chars(&["GATTACA"]), 0, 1, 0, false).unwrap();
        assert_eq!(words.num_symbols(), 4);
        assert_eq!(words.sequence(0), &[2, 0, 3, 3, 0, 1, 0]);
    }

    #[test]
    fn test_order_two_words() {
        let feats = chars(&["ACGT"]);
        let words = StringWordFeatures::obtain_from_char(&feats, 1, 2, 0, false).unwrap();
        assert_eq!(words.num_symbols(), 16);
        // AC, CG, GT
        assert_eq!(words.sequence(0), &[1, 6, 11]);

        let reversed = StringWordFeatures::obtain_from_char(&feats, 1, 2, 0, true).unwrap();
        // CA, GC, TG
        assert_eq!(reversed.sequence(0), &[4, 9, 14]);
    }

    #[test]
    fn test_gap_skips_middle_symbols() {
        let words = StringWordFeatures::obtain_from_char(&chars(&["ACGT"]), 0, 2, 1, false).unwrap();
        // A_G, C_T
        assert_eq!(words.sequence(0), &[2, 7]);
    }

    #[test]
    fn test_sequence_too_short() {
        assert!(StringWordFeatures::obtain_from_char(&chars(&["AC"]), 0, 3, 0, false).is_err());
        assert!(StringWordFeatures::obtain_from_char(&chars(&["AC"]), 0, 0, 0, false).is_err());
    }

    #[test]
    fn test_compatibility() {
        let a = StringWordFeatures::obtain_from_char(&chars(&["ACGT"]), 0, 1, 0, false).unwrap();
        let b = StringWordFeatures::obtain_from_char(&chars(&["ACGT"]), 1, 2, 0, false).unwrap();
        assert!(a.check_compatible(&a.clone()).is_ok());
        assert!(matches!(a.check_compatible(&b), Err(Error::AlphabetMismatch(_))));
    }
}
