//! `targ_rec.par`: target recognition thresholds.

use ptv_params_core::{resize_to, FieldCodec, Pad};
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargRecParams {
    /// Grey value threshold per camera.
    pub gvthres: Vec<i32>,
    /// Maximum grey value discontinuity inside one target.
    pub disco: i32,
    pub nnmin: i32,
    pub nnmax: i32,
    pub nxmin: i32,
    pub nxmax: i32,
    pub nymin: i32,
    pub nymax: i32,
    pub sumg_min: i32,
    /// Size of the cross drawn over detected targets.
    pub cr_sz: i32,
}

impl Default for TargRecParams {
    fn default() -> Self {
        Self {
            gvthres: Vec::new(),
            disco: 100,
            nnmin: 4,
            nnmax: 500,
            nxmin: 2,
            nxmax: 100,
            nymin: 2,
            nymax: 100,
            sumg_min: 150,
            cr_sz: 2,
        }
    }
}

/// Threshold used for cameras that have none.
pub const DEFAULT_GVTHRES: i32 = 9;

impl LegacyRecord for TargRecParams {
    const SECTION: &'static str = "targ_rec";
    const FILENAME: &'static str = "targ_rec.par";

    fn layout(&mut self, n_cam: usize, codec: &mut dyn FieldCodec) {
        resize_to(&mut self.gvthres, n_cam, Pad::RepeatLast(DEFAULT_GVTHRES));
        for thres in &mut self.gvthres {
            codec.int("gvthres", thres);
        }
        codec.int("disco", &mut self.disco);
        codec.int("nnmin", &mut self.nnmin);
        codec.int("nnmax", &mut self.nnmax);
        codec.int("nxmin", &mut self.nxmin);
        codec.int("nxmax", &mut self.nxmax);
        codec.int("nymin", &mut self.nymin);
        codec.int("nymax", &mut self.nymax);
        codec.int("sumg_min", &mut self.sumg_min);
        codec.int("cr_sz", &mut self.cr_sz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_follow_camera_count() {
        let text = "9\n9\n11\n100\n4\n500\n2\n100\n2\n100\n150\n2\n";
        let rec = TargRecParams::parse_par(text, Some(3), "targ_rec.par")
            .into_strict()
            .unwrap();
        assert_eq!(rec.gvthres, [9, 9, 11]);
        assert_eq!(rec.sumg_min, 150);
        assert_eq!(rec.to_par_string(Some(3)), text);
    }

    #[test]
    fn missing_file_uses_defaults_sized_to_cameras() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = TargRecParams::read(dir.path(), Some(2));
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.value.gvthres, [DEFAULT_GVTHRES, DEFAULT_GVTHRES]);
    }
}
