//! Native configuration records for the PTV engine.
//!
//! The engine consumes five small typed records and one calibration per
//! camera. This crate builds them from the typed legacy sections:
//!
//! - [`ControlPar`] from `ptv` + `cal_ori` (hard length check on calibration names),
//! - [`SequencePar`] from `sequence` (hard length check on base names),
//! - [`VolumePar`] from `criteria`,
//! - [`TrackPar`] from `track`,
//! - [`TargetPar`] from `targ_rec`,
//! - [`Calibration`] per camera from `<name>.ori` / `<name>.addpar`.
//!
//! [`NativeConfig::build`] does all of it at once. Records are rebuilt on
//! every call; nothing is cached.

mod builder;
mod calibration;
mod control;
mod error;
mod sequence;
mod target;
mod track;
mod volume;

pub use builder::{calibration_paths, load_calibrations, NativeConfig, NativeSections};
pub use calibration::{rotation_matrix, AddPar, Calibration, Exterior, Interior};
pub use control::{control_par, ControlPar, MultimediaPar};
pub use error::{CalibrationError, NativeConfigError};
pub use sequence::{sequence_par, SequencePar};
pub use target::{target_par, TargetPar};
pub use track::{track_par, TrackPar};
pub use volume::{volume_par, VolumePar};
