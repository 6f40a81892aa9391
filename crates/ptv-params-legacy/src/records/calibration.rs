//! Calibration-stage sections: `detect_plate.par`, `orient.par`, `sortgrid.par`.

use ptv_params_core::FieldCodec;
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

/// Target detection on calibration plate images.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectPlateParams {
    pub gvth_1: i32,
    pub gvth_2: i32,
    pub gvth_3: i32,
    pub gvth_4: i32,
    pub tol_dis: i32,
    pub min_npix: i32,
    pub max_npix: i32,
    pub min_npix_x: i32,
    pub max_npix_x: i32,
    pub min_npix_y: i32,
    pub max_npix_y: i32,
    pub sum_grey: i32,
    pub size_cross: i32,
}

impl Default for DetectPlateParams {
    fn default() -> Self {
        Self {
            gvth_1: 40,
            gvth_2: 40,
            gvth_3: 40,
            gvth_4: 40,
            tol_dis: 500,
            min_npix: 25,
            max_npix: 400,
            min_npix_x: 5,
            max_npix_x: 50,
            min_npix_y: 5,
            max_npix_y: 50,
            sum_grey: 100,
            size_cross: 3,
        }
    }
}

impl LegacyRecord for DetectPlateParams {
    const SECTION: &'static str = "detect_plate";
    const FILENAME: &'static str = "detect_plate.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.int("gvth_1", &mut self.gvth_1);
        codec.int("gvth_2", &mut self.gvth_2);
        codec.int("gvth_3", &mut self.gvth_3);
        codec.int("gvth_4", &mut self.gvth_4);
        codec.int("tol_dis", &mut self.tol_dis);
        codec.int("min_npix", &mut self.min_npix);
        codec.int("max_npix", &mut self.max_npix);
        codec.int("min_npix_x", &mut self.min_npix_x);
        codec.int("max_npix_x", &mut self.max_npix_x);
        codec.int("min_npix_y", &mut self.min_npix_y);
        codec.int("max_npix_y", &mut self.max_npix_y);
        codec.int("sum_grey", &mut self.sum_grey);
        codec.int("size_cross", &mut self.size_cross);
    }
}

/// Which orientation parameters the calibration optimiser may vary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientParams {
    /// Number of points used for orientation (0 = all).
    pub pnfo: i32,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub cc: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub xh: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub yh: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub k1: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub k2: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub k3: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub p1: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub p2: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub scale: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub shear: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub interf: bool,
}

impl LegacyRecord for OrientParams {
    const SECTION: &'static str = "orient";
    const FILENAME: &'static str = "orient.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.int("pnfo", &mut self.pnfo);
        codec.flag("cc", &mut self.cc);
        codec.flag("xh", &mut self.xh);
        codec.flag("yh", &mut self.yh);
        codec.flag("k1", &mut self.k1);
        codec.flag("k2", &mut self.k2);
        codec.flag("k3", &mut self.k3);
        codec.flag("p1", &mut self.p1);
        codec.flag("p2", &mut self.p2);
        codec.flag("scale", &mut self.scale);
        codec.flag("shear", &mut self.shear);
        codec.flag("interf", &mut self.interf);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortGridParams {
    /// Search radius in pixels when sorting detected plate targets.
    pub radius: i32,
}

impl Default for SortGridParams {
    fn default() -> Self {
        Self { radius: 20 }
    }
}

impl LegacyRecord for SortGridParams {
    const SECTION: &'static str = "sortgrid";
    const FILENAME: &'static str = "sortgrid.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.int("radius", &mut self.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orient_flags_round_trip_as_integers() {
        let text = "0\n1\n1\n1\n0\n0\n0\n0\n0\n0\n0\n0\n";
        let rec = OrientParams::parse_par(text, None, "orient.par")
            .into_strict()
            .unwrap();
        assert!(rec.cc && rec.xh && rec.yh);
        assert!(!rec.k1);
        assert_eq!(rec.to_par_string(None), text);
    }

    #[test]
    fn detect_plate_keeps_field_order() {
        let rec = DetectPlateParams {
            size_cross: 7,
            ..DetectPlateParams::default()
        };
        let text = rec.to_par_string(None);
        assert_eq!(text.lines().count(), 13);
        assert_eq!(text.lines().last(), Some("7"));
    }
}
