//! `track.par`: tracking velocity and acceleration limits.

use ptv_params_core::FieldCodec;
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingParams {
    pub dvxmin: f64,
    pub dvxmax: f64,
    pub dvymin: f64,
    pub dvymax: f64,
    pub dvzmin: f64,
    pub dvzmax: f64,
    /// Maximum direction change between links, in gon.
    pub angle: f64,
    /// Maximum acceleration between links.
    pub dacc: f64,
    /// Allow new particles to be added during tracking.
    #[serde(
        rename = "flagNewParticles",
        deserialize_with = "crate::flag::deserialize"
    )]
    pub flag_new_particles: bool,
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            dvxmin: -2.0,
            dvxmax: 2.0,
            dvymin: -2.0,
            dvymax: 2.0,
            dvzmin: -2.0,
            dvzmax: 2.0,
            angle: 100.0,
            dacc: 0.5,
            flag_new_particles: true,
        }
    }
}

impl LegacyRecord for TrackingParams {
    const SECTION: &'static str = "track";
    const FILENAME: &'static str = "track.par";

    fn layout(&mut self, _n_cam: usize, codec: &mut dyn FieldCodec) {
        codec.float("dvxmin", &mut self.dvxmin);
        codec.float("dvxmax", &mut self.dvxmax);
        codec.float("dvymin", &mut self.dvymin);
        codec.float("dvymax", &mut self.dvymax);
        codec.float("dvzmin", &mut self.dvzmin);
        codec.float("dvzmax", &mut self.dvzmax);
        codec.float("angle", &mut self.angle);
        codec.float("dacc", &mut self.dacc);
        codec.flag("flagNewParticles", &mut self.flag_new_particles);
    }
}
