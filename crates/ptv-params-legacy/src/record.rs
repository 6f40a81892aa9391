//! The [`LegacyRecord`] trait shared by every `.par` section.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use ptv_params_core::{
    Diagnostic, DiagnosticKind, FieldCodec, Loaded, ParReader, ParWriter, SizingCodec, MAX_CAMS,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

/// Conversion between a typed record and its section mapping failed.
#[derive(thiserror::Error, Debug)]
pub enum SectionError {
    #[error("section `{section}`: {source}")]
    Convert {
        section: &'static str,
        source: serde_yaml::Error,
    },
    #[error("section `{section}` is not a mapping")]
    NotAMapping { section: String },
}

/// One legacy parameter file.
///
/// Implementors only declare [`layout`](LegacyRecord::layout); reading,
/// writing, camera fitting and section conversion are derived from it.
pub trait LegacyRecord: Clone + Default + Serialize + DeserializeOwned {
    /// Section name in the unified document (file stem of [`Self::FILENAME`]).
    const SECTION: &'static str;
    const FILENAME: &'static str;

    /// Visit every field in on-disk order.
    ///
    /// Per-camera lists must be resized to `n_cam` (with the record's own
    /// padding policy) before they are visited.
    fn layout(&mut self, n_cam: usize, codec: &mut dyn FieldCodec);

    /// Default record with per-camera lists sized to `n_cam`.
    fn with_cameras(n_cam: Option<usize>) -> Self {
        let mut rec = Self::default();
        rec.fit_to_cameras(n_cam);
        rec
    }

    /// Pad or truncate per-camera lists to `n_cam` entries.
    fn fit_to_cameras(&mut self, n_cam: Option<usize>) {
        self.layout(n_cam.unwrap_or(MAX_CAMS), &mut SizingCodec);
    }

    fn parse_par(text: &str, n_cam: Option<usize>, source: &str) -> Loaded<Self> {
        let mut rec = Self::default();
        let mut reader = ParReader::new(source, text);
        rec.layout(n_cam.unwrap_or(MAX_CAMS), &mut reader);
        Loaded::with_warnings(rec, reader.finish())
    }

    /// Read `<dir>/<FILENAME>`. A missing or unreadable file yields the
    /// defaults and a warning.
    fn read(dir: &Path, n_cam: Option<usize>) -> Loaded<Self> {
        let path = dir.join(Self::FILENAME);
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse_par(&text, n_cam, &path.display().to_string()),
            Err(err) => {
                let kind = if err.kind() == ErrorKind::NotFound {
                    DiagnosticKind::MissingFile
                } else {
                    DiagnosticKind::Io
                };
                let warning = Diagnostic::warn(
                    kind,
                    path.display().to_string(),
                    format!("{err}; using defaults"),
                );
                Loaded::with_warnings(Self::with_cameras(n_cam), vec![warning])
            }
        }
    }

    fn to_par_string(&self, n_cam: Option<usize>) -> String {
        let mut rec = self.clone();
        let mut writer = ParWriter::new();
        rec.layout(n_cam.unwrap_or(MAX_CAMS), &mut writer);
        writer.finish()
    }

    /// Write `<dir>/<FILENAME>`; I/O errors are logged and reported as `false`.
    fn write(&self, dir: &Path, n_cam: Option<usize>) -> bool {
        let path = dir.join(Self::FILENAME);
        match fs::write(&path, self.to_par_string(n_cam)) {
            Ok(()) => {
                log::debug!("wrote {}", path.display());
                true
            }
            Err(err) => {
                log::error!("failed to write {}: {err}", path.display());
                false
            }
        }
    }

    fn to_section(&self) -> Result<Value, SectionError> {
        serde_yaml::to_value(self).map_err(|source| SectionError::Convert {
            section: Self::SECTION,
            source,
        })
    }

    /// Build the record from a section mapping. Missing keys take defaults,
    /// unknown keys are ignored, lists are taken as they are.
    fn from_section(value: &Value) -> Result<Self, SectionError> {
        if !value.is_mapping() {
            return Err(SectionError::NotAMapping {
                section: Self::SECTION.to_string(),
            });
        }
        serde_yaml::from_value(value.clone()).map_err(|source| SectionError::Convert {
            section: Self::SECTION,
            source,
        })
    }
}
