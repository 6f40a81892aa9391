use std::path::PathBuf;

use ptv_params_legacy::SectionError;
use ptv_params_native::NativeConfigError;

/// Errors returned by [`ParameterManager`](crate::ParameterManager) and
/// [`Experiment`](crate::Experiment).
///
/// Missing optional files and malformed values are not errors; they are
/// collected as diagnostics instead.
#[derive(thiserror::Error, Debug)]
pub enum ParamsError {
    #[error("parameter section `{0}` does not exist")]
    MissingSection(String),

    #[error("YAML parameter file {} not found", .0.display())]
    YamlNotFound(PathBuf),

    #[error("no YAML path known; load from or save to a YAML file first")]
    NoYamlPath,

    #[error("camera count {0} exceeds the supported maximum of {max}", max = ptv_params_core::MAX_DECLARED_COUNT)]
    TooManyCameras(usize),

    #[error("invalid parameter document: {0}")]
    InvalidDocument(String),

    #[error("parameter set `{0}` does not exist")]
    UnknownParamSet(String),

    #[error("parameter set `{0}` is active and cannot be removed")]
    ActiveParamSet(String),

    #[error("parameter set `{0}` already exists")]
    ParamSetExists(String),

    #[error("`{0}` is not a valid parameter set name")]
    InvalidParamSetName(String),

    #[error("experiment has no parameter sets")]
    NoParamSets,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Section(#[from] SectionError),

    #[error(transparent)]
    Native(#[from] NativeConfigError),
}
