//! Table of every recognised legacy section.
//!
//! [`SectionKind`] maps section names and file names to their record type
//! and lets callers that only hold a section mapping (the unified document)
//! read, write and fit sections without naming the concrete type.

use std::path::Path;

use ptv_params_core::{Diagnostic, DiagnosticKind, Loaded};
use serde_yaml::Value;

use crate::record::{LegacyRecord, SectionError};
use crate::records::{
    CalOriParams, CriteriaParams, DetectPlateParams, DumbbellParams, ExamineParams, ManOriParams,
    MultiPlaneParams, OrientParams, PftVersionParams, PtvParams, SequenceParams, ShakingParams,
    SortGridParams, TargRecParams, TrackingParams, MAN_ORI_POINTS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Ptv,
    CalOri,
    Sequence,
    Criteria,
    TargRec,
    ManOri,
    DetectPlate,
    Orient,
    Track,
    PftVersion,
    Examine,
    Dumbbell,
    Shaking,
    MultiPlanes,
    SortGrid,
}

/// A per-camera list field and how many entries each camera owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraList {
    pub field: &'static str,
    pub per_camera: usize,
}

const fn one(field: &'static str) -> CameraList {
    CameraList {
        field,
        per_camera: 1,
    }
}

macro_rules! with_record {
    ($kind:expr, $rec:ident => $body:expr) => {
        match $kind {
            SectionKind::Ptv => {
                type $rec = PtvParams;
                $body
            }
            SectionKind::CalOri => {
                type $rec = CalOriParams;
                $body
            }
            SectionKind::Sequence => {
                type $rec = SequenceParams;
                $body
            }
            SectionKind::Criteria => {
                type $rec = CriteriaParams;
                $body
            }
            SectionKind::TargRec => {
                type $rec = TargRecParams;
                $body
            }
            SectionKind::ManOri => {
                type $rec = ManOriParams;
                $body
            }
            SectionKind::DetectPlate => {
                type $rec = DetectPlateParams;
                $body
            }
            SectionKind::Orient => {
                type $rec = OrientParams;
                $body
            }
            SectionKind::Track => {
                type $rec = TrackingParams;
                $body
            }
            SectionKind::PftVersion => {
                type $rec = PftVersionParams;
                $body
            }
            SectionKind::Examine => {
                type $rec = ExamineParams;
                $body
            }
            SectionKind::Dumbbell => {
                type $rec = DumbbellParams;
                $body
            }
            SectionKind::Shaking => {
                type $rec = ShakingParams;
                $body
            }
            SectionKind::MultiPlanes => {
                type $rec = MultiPlaneParams;
                $body
            }
            SectionKind::SortGrid => {
                type $rec = SortGridParams;
                $body
            }
        }
    };
}

impl SectionKind {
    /// Every section, `ptv` first. Loaders and writers use this order.
    pub const ALL: [SectionKind; 15] = [
        SectionKind::Ptv,
        SectionKind::CalOri,
        SectionKind::Sequence,
        SectionKind::Criteria,
        SectionKind::TargRec,
        SectionKind::ManOri,
        SectionKind::DetectPlate,
        SectionKind::Orient,
        SectionKind::Track,
        SectionKind::PftVersion,
        SectionKind::Examine,
        SectionKind::Dumbbell,
        SectionKind::Shaking,
        SectionKind::MultiPlanes,
        SectionKind::SortGrid,
    ];

    pub fn section(self) -> &'static str {
        with_record!(self, R => R::SECTION)
    }

    pub fn filename(self) -> &'static str {
        with_record!(self, R => R::FILENAME)
    }

    pub fn from_section(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.section() == name)
    }

    pub fn from_filename(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.filename() == name)
    }

    /// Per-camera list fields of this section.
    pub fn camera_lists(self) -> &'static [CameraList] {
        const PTV: &[CameraList] = &[one("img_name"), one("img_cal")];
        const CAL_ORI: &[CameraList] = &[one("img_cal_name"), one("img_ori")];
        const SEQUENCE: &[CameraList] = &[one("base_name")];
        const TARG_REC: &[CameraList] = &[one("gvthres")];
        const MAN_ORI: &[CameraList] = &[CameraList {
            field: "nr",
            per_camera: MAN_ORI_POINTS,
        }];
        match self {
            SectionKind::Ptv => PTV,
            SectionKind::CalOri => CAL_ORI,
            SectionKind::Sequence => SEQUENCE,
            SectionKind::TargRec => TARG_REC,
            SectionKind::ManOri => MAN_ORI,
            _ => &[],
        }
    }

    /// Read this section's file from `dir` into a section mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(section = self.section()))
    )]
    pub fn read(self, dir: &Path, n_cam: Option<usize>) -> Result<Loaded<Value>, SectionError> {
        with_record!(self, R => {
            let Loaded { value, warnings } = R::read(dir, n_cam);
            Ok(Loaded::with_warnings(value.to_section()?, warnings))
        })
    }

    /// Default section mapping with lists sized to `n_cam`.
    pub fn default_section(self, n_cam: Option<usize>) -> Result<Value, SectionError> {
        with_record!(self, R => R::with_cameras(n_cam).to_section())
    }

    /// Fit a section mapping to `n_cam` cameras and write it to `dir`.
    ///
    /// `Ok(false)` means the file could not be written (already logged).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(section = self.section()))
    )]
    pub fn write(self, section: &Value, dir: &Path, n_cam: Option<usize>) -> Result<bool, SectionError> {
        with_record!(self, R => {
            let mut rec = R::from_section(section)?;
            rec.fit_to_cameras(n_cam);
            Ok(rec.write(dir, n_cam))
        })
    }

    /// Fit the per-camera lists of a section mapping to `n_cam` in place.
    /// Keys that are not camera lists are left untouched.
    pub fn fit_section(self, section: &mut Value, n_cam: Option<usize>) -> Result<(), SectionError> {
        let fitted = with_record!(self, R => {
            let mut rec = R::from_section(section)?;
            rec.fit_to_cameras(n_cam);
            rec.to_section()?
        });
        if let (Some(target), Some(fitted)) = (section.as_mapping_mut(), fitted.as_mapping()) {
            for list in self.camera_lists() {
                if let Some(value) = fitted.get(list.field) {
                    target.insert(list.field.into(), value.clone());
                }
            }
        }
        Ok(())
    }

    /// Render a section mapping as `.par` text.
    pub fn to_par_string(self, section: &Value, n_cam: Option<usize>) -> Result<String, SectionError> {
        with_record!(self, R => Ok(R::from_section(section)?.to_par_string(n_cam)))
    }

    /// Check that every per-camera list in `section` has exactly the
    /// expected number of entries. Mismatches are reported, not fixed.
    pub fn check_camera_lists(self, section: &Value, n_cam: usize) -> Vec<Diagnostic> {
        self.camera_lists()
            .iter()
            .filter_map(|list| {
                let expected = n_cam * list.per_camera;
                let found = section.get(list.field).and_then(Value::as_sequence)?.len();
                (found != expected).then(|| {
                    Diagnostic::warn(
                        DiagnosticKind::CameraCount,
                        self.section(),
                        format!(
                            "`{}` has {found} entries, expected {expected} for {n_cam} camera(s)",
                            list.field
                        ),
                    )
                })
            })
            .collect()
    }
}
