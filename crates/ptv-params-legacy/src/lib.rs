//! Legacy OpenPTV parameter files.
//!
//! An experiment's legacy configuration is a directory of small,
//! position-encoded `.par` files (one value per line, no keys), plus a few
//! side files. This crate provides:
//! - one typed record per `.par` file, each declaring its field order once
//!   ([`LegacyRecord::layout`]) for both reading and writing,
//! - [`SectionKind`], a registry that maps section names and file names to
//!   those records and works on untyped section mappings,
//! - `man_ori.dat` coordinates ([`ManOriCoordinates`]),
//! - the plugin registry and its `plugins.json` side file ([`PluginRegistry`]).
//!
//! ## Example
//!
//! ```no_run
//! use ptv_params_legacy::{LegacyRecord, PtvParams, SequenceParams};
//! use std::path::Path;
//!
//! let dir = Path::new("experiment/parameters");
//! let ptv = PtvParams::read(dir, None);
//! let n_cam = ptv.value.camera_count();
//! let seq = SequenceParams::read(dir, Some(n_cam));
//! for warning in ptv.warnings.iter().chain(&seq.warnings) {
//!     eprintln!("{warning}");
//! }
//! ```

mod flag;
mod man_ori_dat;
mod plugins;
mod record;
mod records;
mod registry;

pub use man_ori_dat::{ManOriCoordinates, ManOriPoint, MAN_ORI_DAT};
pub use plugins::{classify, PluginRegistry, PluginRole, DEFAULT_PLUGIN, PLUGINS_FILE};
pub use record::{LegacyRecord, SectionError};
pub use records::{
    CalOriParams, CriteriaParams, DetectPlateParams, DumbbellParams, ExamineParams, ManOriParams,
    MultiPlaneParams, OrientParams, PftVersionParams, PtvParams, SequenceParams, ShakingParams,
    SortGridParams, TargRecParams, TrackingParams, DEFAULT_GVTHRES, MAN_ORI_POINTS,
};
pub use registry::{CameraList, SectionKind};
