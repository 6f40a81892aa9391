//! Parameter management for particle tracking velocimetry.
//!
//! An experiment's configuration exists in two forms:
//! - a legacy directory of position-encoded `.par` files plus
//!   `man_ori.dat` and `plugins.json`,
//! - one unified YAML document with a top-level `num_cams`.
//!
//! [`ParameterManager`] converts losslessly between them, owns the single
//! authoritative camera count, fills in default `plugins`, `masking` and
//! `unsharp_mask` sections, and builds the typed records the native PTV
//! engine consumes ([`NativeConfig`]). [`Experiment`] manages several
//! parameter sets in one directory.
//!
//! ## Quickstart
//!
//! ```no_run
//! use ptv_params::{ParameterManager, PtvParams};
//!
//! # fn main() -> Result<(), ptv_params::ParamsError> {
//! let mut params = ParameterManager::from_directory("experiment/parameters")?;
//! for warning in params.diagnostics() {
//!     eprintln!("{warning}");
//! }
//! let ptv: PtvParams = params.section()?;
//! println!("{} cameras, {}x{} px", params.get_n_cam(), ptv.imx, ptv.imy);
//!
//! params.to_yaml("experiment/parameters_run1.yaml")?;
//! let native = params.native_config("experiment")?;
//! println!("{} calibrations loaded", native.value.calibrations.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `cli` (default): the `ptv-params` command-line tool.
//! - `tracing`: spans around loading, saving and native builds.

mod defaults;
mod directory;
mod error;
mod experiment;
mod manager;
mod yaml;

pub use defaults::{
    MaskingParams, UnsharpMaskParams, MAN_ORI_COORDINATES, MASKING, NUM_CAMS, PLUGINS,
    UNSHARP_MASK,
};
pub use error::ParamsError;
pub use experiment::{Experiment, DEFAULT_PARAMSET, LEGACY_DIR};
pub use manager::ParameterManager;

pub use ptv_params_core as core;
pub use ptv_params_legacy as legacy;
pub use ptv_params_native as native;

pub use ptv_params_core::{Diagnostic, DiagnosticKind, Loaded, StrictError};
pub use ptv_params_legacy::{
    CalOriParams, CriteriaParams, DetectPlateParams, DumbbellParams, ExamineParams,
    LegacyRecord, ManOriCoordinates, ManOriParams, ManOriPoint, MultiPlaneParams, OrientParams,
    PftVersionParams, PluginRegistry, PtvParams, SectionKind, SequenceParams, ShakingParams,
    SortGridParams, TargRecParams, TrackingParams,
};
pub use ptv_params_native::{Calibration, NativeConfig, NativeConfigError, NativeSections};
