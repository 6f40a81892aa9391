//! Shared building blocks for reading and writing PTV parameter files.
//!
//! This crate knows nothing about individual parameter sections. It provides
//! the positional line codec used by every legacy `.par` record, `%g`-style
//! number formatting, per-camera list sizing, and the diagnostics type used
//! for best-effort loading.

mod codec;
mod diagnostics;
mod format;
mod logger;
mod resize;

pub use codec::{FieldCodec, ParReader, ParWriter, SizingCodec};
pub use diagnostics::{Diagnostic, DiagnosticKind, Loaded, StrictError};
pub use format::{
    first_token, format_g, parse_count, parse_flag, parse_float, parse_int, ValueError,
};
pub use resize::{
    is_placeholder, placeholder, resize_to, Pad, MAX_CAMS, MAX_DECLARED_COUNT, PLACEHOLDER,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
