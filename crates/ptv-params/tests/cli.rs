#![cfg(feature = "cli")]

mod common;

use std::fs;

use assert_cmd::Command;
use common::{copy_calibrations, testdata_path};
use predicates::prelude::*;

fn ptv_params() -> Command {
    Command::cargo_bin("ptv-params").unwrap()
}

fn converted(dir: &std::path::Path) -> std::path::PathBuf {
    let yaml = dir.join("parameters.yaml");
    ptv_params()
        .arg("convert")
        .arg(testdata_path("parameters"))
        .arg(&yaml)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 camera(s), 0 warning(s)"));
    yaml
}

#[test]
fn convert_then_show_a_section() {
    let tmp = tempfile::tempdir().unwrap();
    let yaml = converted(tmp.path());
    assert!(fs::read_to_string(&yaml).unwrap().starts_with("num_cams: 4\n"));

    ptv_params()
        .arg("show")
        .arg(&yaml)
        .arg("ptv")
        .assert()
        .success()
        .stdout(predicate::str::contains("imx: 1280"));

    ptv_params()
        .arg("show")
        .arg(&yaml)
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("`nope` does not exist"));
}

#[test]
fn export_writes_par_files() {
    let tmp = tempfile::tempdir().unwrap();
    let yaml = converted(tmp.path());
    let out = tmp.path().join("out");
    ptv_params()
        .arg("export")
        .arg(&yaml)
        .arg(&out)
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(out.join("ptv.par")).unwrap(),
        fs::read_to_string(testdata_path("parameters/ptv.par")).unwrap()
    );
}

#[test]
fn check_reports_missing_images_and_passes() {
    let tmp = tempfile::tempdir().unwrap();
    let yaml = converted(tmp.path());
    copy_calibrations(tmp.path());

    ptv_params()
        .arg("check")
        .arg(&yaml)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 4 camera(s), frames 10001..=10004"))
        .stderr(predicate::str::contains("ptv.par: img_name"))
        .stderr(predicate::str::contains("warning: ").not());

    ptv_params()
        .arg("check")
        .arg(&yaml)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("warning(s) while loading"));
}

#[test]
fn export_into_a_blocked_directory_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let yaml = converted(tmp.path());
    let out = tmp.path().join("out");
    fs::create_dir_all(out.join("sequence.par")).unwrap();

    ptv_params()
        .arg("export")
        .arg(&yaml)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("some files could not be written"));
    assert!(out.join("ptv.par").is_file());
}

#[test]
fn check_rejects_short_calibration_lists() {
    let tmp = tempfile::tempdir().unwrap();
    let yaml = tmp.path().join("short.yaml");
    fs::write(
        &yaml,
        "num_cams: 2\nptv:\n  img_name: [a, b]\n  img_cal: [ca, cb]\n\
         cal_ori:\n  img_cal_name: [ca]\n  img_ori: [ca.ori]\n\
         sequence:\n  base_name: [a., b.]\n",
    )
    .unwrap();

    ptv_params()
        .arg("check")
        .arg(&yaml)
        .arg("--root")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("num_cams is 2"));
}

#[test]
fn plugins_lists_scanned_names() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("ext_sequence_rembg.py"), "").unwrap();
    fs::write(tmp.path().join("ext_tracker_denis.py"), "").unwrap();

    ptv_params()
        .arg("plugins")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("sequence: default, ext_sequence_rembg"))
        .stdout(predicate::str::contains("tracking: default, ext_tracker_denis"))
        .stdout(predicate::str::contains("selected: sequence=default tracking=default"));
}
