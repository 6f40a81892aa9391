//! `man_ori.par`: point numbers used for manual orientation.

use ptv_params_core::{resize_to, FieldCodec, Pad};
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

/// Calibration body point numbers clicked per camera, four per camera,
/// stored camera-major.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManOriParams {
    pub nr: Vec<i32>,
}

/// Reference points per camera in manual orientation.
pub const MAN_ORI_POINTS: usize = 4;

impl LegacyRecord for ManOriParams {
    const SECTION: &'static str = "man_ori";
    const FILENAME: &'static str = "man_ori.par";

    fn layout(&mut self, n_cam: usize, codec: &mut dyn FieldCodec) {
        resize_to(&mut self.nr, n_cam * MAN_ORI_POINTS, Pad::With(0));
        for nr in &mut self.nr {
            codec.int("nr", nr);
        }
    }
}

impl ManOriParams {
    /// Point numbers of one camera.
    pub fn camera_points(&self, cam: usize) -> Option<&[i32]> {
        let start = cam * MAN_ORI_POINTS;
        self.nr.get(start..start + MAN_ORI_POINTS)
    }
}
