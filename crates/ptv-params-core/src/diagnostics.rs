//! Advisory warnings collected while loading or converting parameters.
//!
//! Loading is best-effort: a missing optional file or a malformed value never
//! aborts the load. Every such event becomes a [`Diagnostic`], is logged once
//! at `warn` level, and travels back to the caller inside [`Loaded`] so that
//! strict callers can still refuse the result.

use std::fmt;

/// What went wrong, coarsely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An optional input file does not exist.
    MissingFile,
    /// A value could not be decoded; the default was kept.
    Malformed,
    /// The file ended before every expected value was read.
    Truncated,
    /// A file referenced by a parameter does not exist on disk.
    MissingReference,
    /// A per-camera list does not have one entry per camera.
    CameraCount,
    /// A file could not be read or written.
    Io,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::MissingFile => "missing file",
            DiagnosticKind::Malformed => "malformed value",
            DiagnosticKind::Truncated => "truncated file",
            DiagnosticKind::MissingReference => "missing reference",
            DiagnosticKind::CameraCount => "camera count",
            DiagnosticKind::Io => "i/o",
        };
        f.write_str(name)
    }
}

/// One advisory warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// File or section the warning is about.
    pub source: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            message: message.into(),
        }
    }

    /// Create the diagnostic and emit it through `log::warn!`.
    pub fn warn(kind: DiagnosticKind, source: impl Into<String>, message: impl Into<String>) -> Self {
        let diag = Self::new(kind, source, message);
        log::warn!("{diag}");
        diag
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.source, self.message, self.kind)
    }
}

/// Returned by [`Loaded::into_strict`] when warnings were collected.
#[derive(Debug)]
pub struct StrictError {
    pub warnings: Vec<Diagnostic>,
}

impl fmt::Display for StrictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} warning(s) while loading", self.warnings.len())?;
        if let Some(first) = self.warnings.first() {
            write!(f, ", first: {first}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StrictError {}

/// A value produced by a best-effort load, plus the warnings it raised.
#[derive(Clone, Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub warnings: Vec<Diagnostic>,
}

impl<T> Loaded<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<Diagnostic>) -> Self {
        Self { value, warnings }
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Move the warnings into `sink` and return the bare value.
    pub fn drain_into(self, sink: &mut Vec<Diagnostic>) -> T {
        sink.extend(self.warnings);
        self.value
    }

    /// Treat any collected warning as an error.
    pub fn into_strict(self) -> Result<T, StrictError> {
        if self.warnings.is_empty() {
            Ok(self.value)
        } else {
            Err(StrictError {
                warnings: self.warnings,
            })
        }
    }
}
