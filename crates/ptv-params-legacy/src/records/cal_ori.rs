//! `cal_ori.par`: calibration target and per-camera calibration/orientation files.

use ptv_params_core::{resize_to, FieldCodec, Pad, PLACEHOLDER};
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalOriParams {
    /// Calibration body point list.
    pub fixp_name: String,
    /// Calibration image per camera; also the base name of its `.ori`/`.addpar` pair.
    pub img_cal_name: Vec<String>,
    /// Orientation file per camera.
    pub img_ori: Vec<String>,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub tiff_flag: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub pair_flag: bool,
    pub chfield: i32,
    /// Calibration images come from a split sensor. Never written to `cal_ori.par`.
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub cal_splitter: bool,
}

impl Default for CalOriParams {
    fn default() -> Self {
        Self {
            fixp_name: "cal/calblock.txt".to_string(),
            img_cal_name: Vec::new(),
            img_ori: Vec::new(),
            tiff_flag: true,
            pair_flag: false,
            chfield: 0,
            cal_splitter: false,
        }
    }
}

impl LegacyRecord for CalOriParams {
    const SECTION: &'static str = "cal_ori";
    const FILENAME: &'static str = "cal_ori.par";

    fn layout(&mut self, n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.text("fixp_name", &mut self.fixp_name);

        // Short lists repeat their last entry, long ones are cut.
        resize_to(
            &mut self.img_cal_name,
            n_cam,
            Pad::RepeatLast(PLACEHOLDER.to_string()),
        );
        resize_to(
            &mut self.img_ori,
            n_cam,
            Pad::RepeatLast(PLACEHOLDER.to_string()),
        );
        for (cal, ori) in self.img_cal_name.iter_mut().zip(self.img_ori.iter_mut()) {
            codec.text("img_cal_name", cal);
            codec.text("img_ori", ori);
        }

        codec.flag("tiff_flag", &mut self.tiff_flag);
        codec.flag("pair_flag", &mut self.pair_flag);
        codec.int("chfield", &mut self.chfield);
    }
}
