#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn testdata_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

/// Copy the 4-camera fixture directory into `dst`.
pub fn copy_parameters(dst: &Path) {
    fs::create_dir_all(dst).expect("create parameter dir");
    for entry in fs::read_dir(testdata_path("parameters")).expect("list fixtures") {
        let path = entry.expect("fixture entry").path();
        let name = path.file_name().expect("file name");
        fs::copy(&path, dst.join(name)).expect("copy fixture");
    }
}

/// Copy the calibration fixtures into `<root>/cal`.
pub fn copy_calibrations(root: &Path) {
    let cal = root.join("cal");
    fs::create_dir_all(&cal).expect("create cal dir");
    for entry in fs::read_dir(testdata_path("cal")).expect("list fixtures") {
        let path = entry.expect("fixture entry").path();
        let name = path.file_name().expect("file name");
        fs::copy(&path, cal.join(name)).expect("copy fixture");
    }
}

/// Names of the files in `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("list dir")
        .filter_map(|e| e.ok()?.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}
