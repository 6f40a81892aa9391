use ptv_params_legacy::TrackingParams;
use serde::{Deserialize, Serialize};

/// Per-frame velocity bounds and link limits for the tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackPar {
    pub dvxmin: f64,
    pub dvxmax: f64,
    pub dvymin: f64,
    pub dvymax: f64,
    pub dvzmin: f64,
    pub dvzmax: f64,
    /// Maximum direction change between links, in gon (passed through unchanged).
    pub dangle: f64,
    pub dacc: f64,
    /// Allow new particles to be added during tracking.
    pub add: bool,
}

impl TrackPar {
    /// `(min, max)` velocity bound per axis, x/y/z.
    pub fn velocity_bounds(&self) -> [(f64, f64); 3] {
        [
            (self.dvxmin, self.dvxmax),
            (self.dvymin, self.dvymax),
            (self.dvzmin, self.dvzmax),
        ]
    }
}

pub fn track_par(track: &TrackingParams) -> TrackPar {
    TrackPar {
        dvxmin: track.dvxmin,
        dvxmax: track.dvxmax,
        dvymin: track.dvymin,
        dvymax: track.dvymax,
        dvzmin: track.dvzmin,
        dvzmax: track.dvzmax,
        dangle: track.angle,
        dacc: track.dacc,
        add: track.flag_new_particles,
    }
}
