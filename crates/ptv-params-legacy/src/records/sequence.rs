//! `sequence.par`: per-camera image base names and the frame range.

use ptv_params_core::{placeholder, resize_to, FieldCodec};
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceParams {
    /// Image base name per camera; frame numbers are appended to it.
    pub base_name: Vec<String>,
    pub first: i32,
    pub last: i32,
}

impl LegacyRecord for SequenceParams {
    const SECTION: &'static str = "sequence";
    const FILENAME: &'static str = "sequence.par";

    fn layout(&mut self, n_cam: usize, codec: &mut dyn FieldCodec) {
        resize_to(&mut self.base_name, n_cam, placeholder());
        for name in &mut self.base_name {
            codec.text("base_name", name);
        }
        codec.int("first", &mut self.first);
        codec.int("last", &mut self.last);
    }
}

impl SequenceParams {
    /// Number of frames in the inclusive range, zero when `last < first`.
    pub fn frame_count(&self) -> usize {
        usize::try_from(i64::from(self.last) - i64::from(self.first) + 1).unwrap_or(0)
    }
}
