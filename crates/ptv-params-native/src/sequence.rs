use ptv_params_legacy::SequenceParams;
use serde::{Deserialize, Serialize};

use crate::NativeConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequencePar {
    pub num_cams: usize,
    pub img_base_name: Vec<String>,
    pub first: i32,
    pub last: i32,
}

impl SequencePar {
    /// Frame numbers from `first` to `last`, inclusive.
    pub fn frames(&self) -> std::ops::RangeInclusive<i32> {
        self.first..=self.last
    }
}

/// Build the sequence record; `base_name` must have exactly `num_cams` entries.
pub fn sequence_par(
    sequence: &SequenceParams,
    num_cams: usize,
) -> Result<SequencePar, NativeConfigError> {
    if sequence.base_name.len() != num_cams {
        return Err(NativeConfigError::LengthMismatch {
            field: "sequence.base_name",
            expected: num_cams,
            got: sequence.base_name.len(),
        });
    }
    Ok(SequencePar {
        num_cams,
        img_base_name: sequence.base_name.clone(),
        first: sequence.first,
        last: sequence.last,
    })
}
