use std::path::PathBuf;

/// Hard failures while building native configuration records.
///
/// Everything else (missing calibration files, missing optional sections)
/// is advisory and comes back as warnings next to the built records.
#[derive(thiserror::Error, Debug)]
pub enum NativeConfigError {
    #[error("`{field}` has {got} entries but num_cams is {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },
}

/// A calibration file pair could not be read or written.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: expected at least {expected} numbers, found {found}")]
    Truncated {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("{path}: `{token}` is not a number")]
    NotANumber { path: PathBuf, token: String },
}
