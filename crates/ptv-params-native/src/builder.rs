use std::path::{Path, PathBuf};

use ptv_params_core::{is_placeholder, Diagnostic, DiagnosticKind, Loaded};
use ptv_params_legacy::{
    CalOriParams, CriteriaParams, LegacyRecord, PtvParams, SequenceParams, TargRecParams,
    TrackingParams,
};
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    control_par, sequence_par, target_par, track_par, volume_par, Calibration, ControlPar,
    NativeConfigError, SequencePar, TargetPar, TrackPar, VolumePar,
};

/// Typed legacy sections the native records are built from.
///
/// `ptv`, `cal_ori` and `sequence` are required; the rest fall back to
/// defaults with a warning.
#[derive(Clone, Debug, Default)]
pub struct NativeSections {
    pub ptv: PtvParams,
    pub cal_ori: CalOriParams,
    pub sequence: SequenceParams,
    pub criteria: Option<CriteriaParams>,
    pub track: Option<TrackingParams>,
    pub targ_rec: Option<TargRecParams>,
}

/// Everything the native engine needs for one invocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NativeConfig {
    pub control: ControlPar,
    pub sequence: SequencePar,
    pub volume: VolumePar,
    pub track: TrackPar,
    pub target: TargetPar,
    pub calibrations: Vec<Calibration>,
}

fn or_default<R: LegacyRecord>(
    section: &Option<R>,
    num_cams: usize,
    warnings: &mut Vec<Diagnostic>,
) -> R {
    match section {
        Some(rec) => rec.clone(),
        None => {
            warnings.push(Diagnostic::warn(
                DiagnosticKind::MissingFile,
                R::SECTION,
                "section absent; native record built from defaults",
            ));
            R::with_cameras(Some(num_cams))
        }
    }
}

impl NativeConfig {
    /// Build every record and load one calibration per camera from `root`.
    ///
    /// Only the control and sequence records can fail; everything else
    /// degrades to defaults and is reported in the returned warnings.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(sections, root), fields(root = %root.display()))
    )]
    pub fn build(
        sections: &NativeSections,
        num_cams: usize,
        root: &Path,
    ) -> Result<Loaded<Self>, NativeConfigError> {
        let control = control_par(&sections.ptv, &sections.cal_ori, num_cams)?;
        let sequence = sequence_par(&sections.sequence, num_cams)?;

        let mut warnings = Vec::new();
        let criteria = or_default(&sections.criteria, num_cams, &mut warnings);
        let track = or_default(&sections.track, num_cams, &mut warnings);
        let targ_rec = or_default(&sections.targ_rec, num_cams, &mut warnings);
        let calibrations = load_calibrations(&control, root).drain_into(&mut warnings);

        log::info!(
            "native configuration ready: {num_cams} camera(s), frames {}..={}",
            sequence.first,
            sequence.last
        );
        Ok(Loaded::with_warnings(
            Self {
                volume: volume_par(&criteria),
                track: track_par(&track),
                target: target_par(&targ_rec, Some(num_cams)),
                control,
                sequence,
                calibrations,
            },
            warnings,
        ))
    }
}

/// `<root>/<base>.ori` and `<root>/<base>.addpar`.
pub fn calibration_paths(root: &Path, base: &str) -> (PathBuf, PathBuf) {
    (
        root.join(format!("{base}.ori")),
        root.join(format!("{base}.addpar")),
    )
}

/// Load one calibration per camera of `control`.
///
/// A camera whose files are missing or unreadable gets
/// [`Calibration::default`] and a warning; a missing `.addpar` alone only
/// resets the distortion terms.
pub fn load_calibrations(control: &ControlPar, root: &Path) -> Loaded<Vec<Calibration>> {
    let mut warnings = Vec::new();
    let calibrations = control
        .cal_img_base_name
        .iter()
        .enumerate()
        .map(|(cam, base)| {
            if is_placeholder(base) {
                warnings.push(Diagnostic::warn(
                    DiagnosticKind::MissingReference,
                    format!("camera {}", cam + 1),
                    "no calibration image name; using a default calibration",
                ));
                return Calibration::default();
            }
            let (ori, addpar_path) = calibration_paths(root, base);
            let addpar = addpar_path.exists().then_some(addpar_path.as_path());
            if addpar.is_none() {
                warnings.push(Diagnostic::warn(
                    DiagnosticKind::MissingReference,
                    addpar_path.display().to_string(),
                    "not found; distortion terms left at zero",
                ));
            }
            match Calibration::from_files(&ori, addpar) {
                Ok(cal) => cal,
                Err(err) => {
                    warnings.push(Diagnostic::warn(
                        DiagnosticKind::MissingReference,
                        format!("camera {}", cam + 1),
                        format!("{err}; using a default calibration"),
                    ));
                    Calibration::default()
                }
            }
        })
        .collect();
    Loaded::with_warnings(calibrations, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sections(n_cam: usize) -> NativeSections {
        let mut cal_ori = CalOriParams::with_cameras(Some(n_cam));
        cal_ori.img_cal_name = (1..=n_cam).map(|i| format!("cal/cam{i}.tif")).collect();
        NativeSections {
            ptv: PtvParams::with_cameras(Some(n_cam)),
            cal_ori,
            sequence: SequenceParams::with_cameras(Some(n_cam)),
            criteria: Some(CriteriaParams::default()),
            track: Some(TrackingParams::default()),
            targ_rec: Some(TargRecParams::with_cameras(Some(n_cam))),
        }
    }

    #[test]
    fn missing_calibration_files_degrade_to_defaults() {
        let root = tempfile::tempdir().unwrap();
        let loaded = NativeConfig::build(&sections(2), 2, root.path()).unwrap();
        assert_eq!(loaded.value.calibrations, [Calibration::default(); 2]);
        // one warning for each missing .addpar and .ori
        assert_eq!(loaded.warnings.len(), 4);
        assert_eq!(loaded.value.target.num_cams(), 2);
    }

    #[test]
    fn missing_optional_sections_are_reported() {
        let root = tempfile::tempdir().unwrap();
        let mut s = sections(1);
        s.cal_ori.img_cal_name = vec!["---".into()];
        s.track = None;
        s.criteria = None;
        let loaded = NativeConfig::build(&s, 1, root.path()).unwrap();
        let sources: Vec<_> = loaded.warnings.iter().map(|w| w.source.as_str()).collect();
        assert_eq!(sources, ["criteria", "track", "camera 1"]);
        assert_eq!(loaded.value.track, track_par(&TrackingParams::default()));
    }

    #[test]
    fn loads_existing_pairs() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("cal")).unwrap();
        let mut cal = Calibration::default();
        cal.set_angles(0.0, 0.5, 0.0);
        let (ori, addpar) = calibration_paths(root.path(), "cal/cam1.tif");
        cal.write(&ori, &addpar).unwrap();

        let control = control_par(
            &PtvParams::with_cameras(Some(1)),
            &CalOriParams {
                img_cal_name: vec!["cal/cam1.tif".into()],
                ..CalOriParams::with_cameras(Some(1))
            },
            1,
        )
        .unwrap();
        let loaded = load_calibrations(&control, root.path());
        assert!(loaded.is_clean());
        assert!((loaded.value[0].angles().y - 0.5).abs() < 1e-8);
    }

    #[test]
    fn sequence_mismatch_fails_the_build() {
        let root = tempfile::tempdir().unwrap();
        let mut s = sections(3);
        s.sequence.base_name.pop();
        assert!(matches!(
            NativeConfig::build(&s, 3, root.path()),
            Err(NativeConfigError::LengthMismatch {
                field: "sequence.base_name",
                ..
            })
        ));
    }
}
