//! `criteria.par`: observation volume and correspondence tolerances.

use ptv_params_core::FieldCodec;
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

/// Illuminated volume (two X layers with their Z bounds) and the
/// correspondence search criteria.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaParams {
    #[serde(rename = "X_lay")]
    pub x_lay: [f64; 2],
    #[serde(rename = "Zmin_lay")]
    pub zmin_lay: [f64; 2],
    #[serde(rename = "Zmax_lay")]
    pub zmax_lay: [f64; 2],
    pub cnx: f64,
    pub cny: f64,
    pub cn: f64,
    pub csumg: f64,
    pub corrmin: f64,
    /// Epipolar band half-width in mm.
    pub eps0: f64,
}

impl Default for CriteriaParams {
    fn default() -> Self {
        Self {
            x_lay: [-40.0, 40.0],
            zmin_lay: [-20.0, -20.0],
            zmax_lay: [25.0, 25.0],
            cnx: 0.02,
            cny: 0.02,
            cn: 0.02,
            csumg: 0.02,
            corrmin: 33.0,
            eps0: 0.06,
        }
    }
}

impl LegacyRecord for CriteriaParams {
    const SECTION: &'static str = "criteria";
    const FILENAME: &'static str = "criteria.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        for i in 0..2 {
            codec.float("X_lay", &mut self.x_lay[i]);
            codec.float("Zmin_lay", &mut self.zmin_lay[i]);
            codec.float("Zmax_lay", &mut self.zmax_lay[i]);
        }
        codec.float("cnx", &mut self.cnx);
        codec.float("cny", &mut self.cny);
        codec.float("cn", &mut self.cn);
        codec.float("csumg", &mut self.csumg);
        codec.float("corrmin", &mut self.corrmin);
        codec.float("eps0", &mut self.eps0);
    }
}
