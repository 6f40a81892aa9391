mod common;

use std::fs;

use approx::assert_relative_eq;
use common::{copy_calibrations, copy_parameters, testdata_path};
use ptv_params::native::Calibration;
use ptv_params::{DiagnosticKind, ParameterManager};

fn fixture() -> ParameterManager {
    let params = ParameterManager::from_directory(testdata_path("parameters")).unwrap();
    assert!(params.diagnostics().is_empty(), "{:?}", params.diagnostics());
    params
}

#[test]
fn fixture_builds_a_clean_native_config() {
    let config = fixture()
        .native_config(testdata_path(""))
        .unwrap()
        .into_strict()
        .unwrap();

    assert_eq!(config.control.num_cams, 4);
    assert_eq!(config.control.imx, 1280);
    assert_eq!(config.control.cal_img_base_name[3], "cal/cam4.tif");
    assert_relative_eq!(config.control.mm.n3, 1.46);

    assert_eq!(config.sequence.first, 10001);
    assert_eq!(config.sequence.frames().count(), 4);
    assert_eq!(config.volume.x_lay, [-40.0, 40.0]);
    assert_relative_eq!(config.volume.corrmin, 33.0);
    assert_relative_eq!(config.track.dangle, 120.0);
    assert!(config.track.add);
    assert_eq!(config.target.gvthres, [9, 9, 9, 11]);

    assert_eq!(config.calibrations.len(), 4);
    let cam2 = &config.calibrations[1];
    assert_relative_eq!(cam2.position().x, 250.0);
    assert_relative_eq!(cam2.position().z, 610.0);
    assert_relative_eq!(cam2.primary_point().z, 60.5);
    assert_relative_eq!(config.calibrations[0].position().x, -250.0);
}

#[test]
fn missing_calibrations_fall_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let config = fixture().native_config(tmp.path()).unwrap();

    assert_eq!(config.value.calibrations.len(), 4);
    assert!(config
        .value
        .calibrations
        .iter()
        .all(|cal| *cal == Calibration::default()));
    // one warning for the missing .addpar and one for the missing .ori, per camera
    assert_eq!(config.warnings.len(), 8);
    assert!(config
        .warnings
        .iter()
        .all(|w| w.kind == DiagnosticKind::MissingReference));
}

#[test]
fn only_the_camera_with_a_missing_ori_is_defaulted() {
    let tmp = tempfile::tempdir().unwrap();
    copy_calibrations(tmp.path());
    fs::remove_file(tmp.path().join("cal/cam3.tif.ori")).unwrap();

    let config = fixture().native_config(tmp.path()).unwrap();
    assert_eq!(config.warnings.len(), 1);
    assert_eq!(config.warnings[0].source, "camera 3");

    let cals = &config.value.calibrations;
    assert_eq!(cals[2], Calibration::default());
    assert_ne!(cals[1], Calibration::default());
    assert_relative_eq!(cals[3].primary_point().z, 60.1);
}

#[test]
fn optional_sections_are_defaulted_with_a_warning() {
    let tmp = tempfile::tempdir().unwrap();
    let par_dir = tmp.path().join("parameters");
    copy_parameters(&par_dir);
    for name in ["criteria.par", "track.par", "targ_rec.par"] {
        fs::remove_file(par_dir.join(name)).unwrap();
    }
    copy_calibrations(tmp.path());

    let params = ParameterManager::from_directory(&par_dir).unwrap();
    let config = params.native_config(tmp.path()).unwrap();
    let sources: Vec<&str> = config.warnings.iter().map(|w| w.source.as_str()).collect();
    assert_eq!(sources, ["criteria", "track", "targ_rec"]);
    assert_eq!(config.value.target.gvthres.len(), 4);
}

#[test]
fn resizing_the_manager_keeps_the_native_config_consistent() {
    let mut params = fixture();
    params.set_n_cam(2).unwrap();
    let config = params
        .native_config(testdata_path(""))
        .unwrap()
        .into_strict()
        .unwrap();
    assert_eq!(config.control.num_cams, 2);
    assert_eq!(config.calibrations.len(), 2);
    assert_eq!(config.target.gvthres, [9, 9]);
    assert_eq!(params.man_ori_coordinates().unwrap().n_cam(), 2);
}
