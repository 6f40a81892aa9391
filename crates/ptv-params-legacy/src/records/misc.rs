//! Small flag and batch sections: `pft_version.par`, `examine.par`,
//! `dumbbell.par`, `shaking.par`, `multi_planes.par`.

use ptv_params_core::{placeholder, resize_to, FieldCodec, MAX_DECLARED_COUNT};
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PftVersionParams {
    /// Reuse existing target files instead of detecting again.
    #[serde(rename = "Existing_Target")]
    pub existing_target: i32,
}

impl LegacyRecord for PftVersionParams {
    const SECTION: &'static str = "pft_version";
    const FILENAME: &'static str = "pft_version.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.int("Existing_Target", &mut self.existing_target);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamineParams {
    #[serde(rename = "Examine_Flag", deserialize_with = "crate::flag::deserialize")]
    pub examine_flag: bool,
    #[serde(rename = "Combine_Flag", deserialize_with = "crate::flag::deserialize")]
    pub combine_flag: bool,
}

impl LegacyRecord for ExamineParams {
    const SECTION: &'static str = "examine";
    const FILENAME: &'static str = "examine.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.flag("Examine_Flag", &mut self.examine_flag);
        codec.flag("Combine_Flag", &mut self.combine_flag);
    }
}

/// Dumbbell calibration settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumbbellParams {
    pub dumbbell_eps: f64,
    /// Distance between the two dumbbell spheres in mm.
    pub dumbbell_scale: f64,
    pub dumbbell_gradient_descent: f64,
    pub dumbbell_penalty_weight: f64,
    pub dumbbell_step: i32,
    pub dumbbell_niter: i32,
}

impl Default for DumbbellParams {
    fn default() -> Self {
        Self {
            dumbbell_eps: 3.0,
            dumbbell_scale: 25.0,
            dumbbell_gradient_descent: 0.05,
            dumbbell_penalty_weight: 1.0,
            dumbbell_step: 1,
            dumbbell_niter: 500,
        }
    }
}

impl LegacyRecord for DumbbellParams {
    const SECTION: &'static str = "dumbbell";
    const FILENAME: &'static str = "dumbbell.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.float("dumbbell_eps", &mut self.dumbbell_eps);
        codec.float("dumbbell_scale", &mut self.dumbbell_scale);
        codec.float("dumbbell_gradient_descent", &mut self.dumbbell_gradient_descent);
        codec.float("dumbbell_penalty_weight", &mut self.dumbbell_penalty_weight);
        codec.int("dumbbell_step", &mut self.dumbbell_step);
        codec.int("dumbbell_niter", &mut self.dumbbell_niter);
    }
}

/// Calibration refinement from tracked particles ("shaking").
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakingParams {
    pub shaking_first_frame: i32,
    pub shaking_last_frame: i32,
    pub shaking_max_num_points: i32,
    pub shaking_max_num_frames: i32,
}

impl LegacyRecord for ShakingParams {
    const SECTION: &'static str = "shaking";
    const FILENAME: &'static str = "shaking.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.int("shaking_first_frame", &mut self.shaking_first_frame);
        codec.int("shaking_last_frame", &mut self.shaking_last_frame);
        codec.int("shaking_max_num_points", &mut self.shaking_max_num_points);
        codec.int("shaking_max_num_frames", &mut self.shaking_max_num_frames);
    }
}

/// Multi-plane calibration: a list of plane parameter files.
///
/// `n_planes` is authoritative; `plane_name` is fitted to it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiPlaneParams {
    pub n_planes: usize,
    pub plane_name: Vec<String>,
}

impl LegacyRecord for MultiPlaneParams {
    const SECTION: &'static str = "multi_planes";
    const FILENAME: &'static str = "multi_planes.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        self.n_planes = self.n_planes.min(MAX_DECLARED_COUNT);
        codec.count("n_planes", &mut self.n_planes);
        resize_to(&mut self.plane_name, self.n_planes, placeholder());
        for name in &mut self.plane_name {
            codec.text("plane_name", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptv_params_core::{DiagnosticKind, PLACEHOLDER};

    #[test]
    fn plane_names_follow_plane_count() {
        let text = "3\nimg/calib_a_cam\nimg/calib_b_cam\nimg/calib_c_cam\n";
        let rec = MultiPlaneParams::parse_par(text, None, "multi_planes.par")
            .into_strict()
            .unwrap();
        assert_eq!(rec.plane_name.len(), 3);
        assert_eq!(rec.to_par_string(None), text);

        let mut grown = rec.clone();
        grown.n_planes = 4;
        grown.fit_to_cameras(None);
        assert_eq!(grown.plane_name[3], PLACEHOLDER);
    }

    #[test]
    fn absurd_plane_count_is_rejected() {
        let loaded = MultiPlaneParams::parse_par("2147483647\n", None, "multi_planes.par");
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].kind, DiagnosticKind::Malformed);
        assert_eq!(loaded.value.n_planes, 0);
        assert!(loaded.value.plane_name.is_empty());
    }

    #[test]
    fn dumbbell_mixes_floats_and_ints() {
        let text = "3\n25\n0.05\n1\n1\n500\n";
        let rec = DumbbellParams::parse_par(text, None, "dumbbell.par")
            .into_strict()
            .unwrap();
        assert_eq!(rec, DumbbellParams::default());
        assert_eq!(rec.to_par_string(None), text);
    }
}
