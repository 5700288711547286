use crate::{Error, Result, Vector};

/// Real-valued targets, one per feature vector.
#[derive(Clone, Debug, PartialEq)]
pub struct Labels {
    values: Vector,
}

impl Labels {
    pub fn new(values: Vector) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::empty_input("labels need at least one value"));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::invalid_parameter(format!("label {} is not finite", bad)));
        }

        Ok(Self { values })
    }

    /// Labels restricted to `+1` and `-1`.
    pub fn binary(values: Vector) -> Result<Self> {
        if let Some(bad) = values.iter().find(|&&v| v != 1.0 && v != -1.0) {
            return Err(Error::invalid_parameter(format!(
                "binary labels must be -1 or +1, got {}",
                bad
            )));
        }
        Self::new(values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_labels(&self) -> &Vector {
        &self.values
    }

    pub fn into_inner(self) -> Vector {
        self.values
    }

    /// Indices of the `+1` and `-1` entries. Other values land in neither list.
    pub fn partition(&self) -> (Vec<usize>, Vec<usize>) {
        let indices_of = |target: f64| {
            self.values
                .iter()
                .enumerate()
                .filter(|&(_, &y)| y == target)
                .map(|(i, _)| i)
                .collect::<Vec<_>>()
        };
        (indices_of(1.0), indices_of(-1.0))
    }
}
