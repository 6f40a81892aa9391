//! `man_ori.dat`: pixel coordinates of the manual-orientation points.
//!
//! The file holds `n_cam * 4` lines of `"<x> <y>"`, camera-major. In the
//! unified document the same data lives under `man_ori_coordinates` as
//! `camera_<i>` (0-based) → `point_<j>` (1-based) → `{x, y}`.

use std::fs;
use std::path::Path;

use ptv_params_core::{format_g, parse_float, Diagnostic, DiagnosticKind, Loaded};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::records::MAN_ORI_POINTS;

pub const MAN_ORI_DAT: &str = "man_ori.dat";

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManOriPoint {
    pub x: f64,
    pub y: f64,
}

impl ManOriPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManOriCoordinates {
    cameras: Vec<[ManOriPoint; MAN_ORI_POINTS]>,
}

fn camera_key(cam: usize) -> String {
    format!("camera_{cam}")
}

fn point_key(point: usize) -> String {
    format!("point_{}", point + 1)
}

fn parse_pair(line: &str) -> Option<ManOriPoint> {
    let mut tokens = line.split_whitespace();
    let x = parse_float(tokens.next()?).ok()?;
    let y = parse_float(tokens.next()?).ok()?;
    Some(ManOriPoint { x, y })
}

impl ManOriCoordinates {
    /// All points at the origin.
    pub fn new(n_cam: usize) -> Self {
        Self {
            cameras: vec![[ManOriPoint::default(); MAN_ORI_POINTS]; n_cam],
        }
    }

    #[inline]
    pub fn n_cam(&self) -> usize {
        self.cameras.len()
    }

    /// Point `point` (0-based) of camera `cam`.
    pub fn point(&self, cam: usize, point: usize) -> Option<ManOriPoint> {
        self.cameras.get(cam)?.get(point).copied()
    }

    pub fn set_point(&mut self, cam: usize, point: usize, value: ManOriPoint) -> bool {
        match self.cameras.get_mut(cam).and_then(|c| c.get_mut(point)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Drop or append cameras; new cameras start at the origin.
    pub fn resize(&mut self, n_cam: usize) {
        self.cameras
            .resize(n_cam, [ManOriPoint::default(); MAN_ORI_POINTS]);
    }

    /// Parse `man_ori.dat` text. Missing or malformed lines become `(0, 0)`.
    pub fn parse_dat(text: &str, n_cam: usize, source: &str) -> Loaded<Self> {
        let mut coords = Self::new(n_cam);
        let mut warnings = Vec::new();
        let mut lines = text.lines();
        let expected = n_cam * MAN_ORI_POINTS;
        let mut missing = 0usize;

        for index in 0..expected {
            let (cam, point) = (index / MAN_ORI_POINTS, index % MAN_ORI_POINTS);
            let Some(line) = lines.next() else {
                missing += 1;
                continue;
            };
            match parse_pair(line) {
                Some(p) => coords.cameras[cam][point] = p,
                None => warnings.push(Diagnostic::warn(
                    DiagnosticKind::Malformed,
                    source,
                    format!("line {}: expected `x y`, found `{}`; using (0, 0)", index + 1, line.trim()),
                )),
            }
        }
        if missing > 0 {
            warnings.push(Diagnostic::warn(
                DiagnosticKind::Truncated,
                source,
                format!("{missing} of {expected} points missing; using (0, 0)"),
            ));
        }
        Loaded::with_warnings(coords, warnings)
    }

    pub fn read_dat(path: &Path, n_cam: usize) -> Loaded<Self> {
        let source = path.display().to_string();
        match fs::read_to_string(path) {
            Ok(text) => Self::parse_dat(&text, n_cam, &source),
            Err(err) => {
                let warning = Diagnostic::warn(DiagnosticKind::MissingFile, source, err.to_string());
                Loaded::with_warnings(Self::new(n_cam), vec![warning])
            }
        }
    }

    pub fn to_dat_string(&self) -> String {
        self.cameras
            .iter()
            .flatten()
            .map(|p| format!("{} {}\n", format_g(p.x), format_g(p.y)))
            .collect()
    }

    /// Write the file; I/O errors are logged and reported as `false`.
    pub fn write_dat(&self, path: &Path) -> bool {
        match fs::write(path, self.to_dat_string()) {
            Ok(()) => true,
            Err(err) => {
                log::error!("failed to write {}: {err}", path.display());
                false
            }
        }
    }

    pub fn to_value(&self) -> Value {
        let mut cameras = Mapping::new();
        for (cam, points) in self.cameras.iter().enumerate() {
            let mut entry = Mapping::new();
            for (point, p) in points.iter().enumerate() {
                let mut xy = Mapping::new();
                xy.insert("x".into(), p.x.into());
                xy.insert("y".into(), p.y.into());
                entry.insert(point_key(point).into(), Value::Mapping(xy));
            }
            cameras.insert(camera_key(cam).into(), Value::Mapping(entry));
        }
        Value::Mapping(cameras)
    }

    /// Read the nested mapping for `n_cam` cameras. Absent or non-numeric
    /// coordinates become `0.0` and are reported once.
    pub fn from_value(value: &Value, n_cam: usize) -> Loaded<Self> {
        let mut coords = Self::new(n_cam);
        let mut incomplete = 0usize;
        for cam in 0..n_cam {
            for point in 0..MAN_ORI_POINTS {
                let entry = value
                    .get(camera_key(cam).as_str())
                    .and_then(|c| c.get(point_key(point).as_str()));
                let x = entry.and_then(|e| e.get("x")).and_then(Value::as_f64);
                let y = entry.and_then(|e| e.get("y")).and_then(Value::as_f64);
                if x.is_none() || y.is_none() {
                    incomplete += 1;
                }
                coords.cameras[cam][point] = ManOriPoint::new(x.unwrap_or(0.0), y.unwrap_or(0.0));
            }
        }
        let warnings = if incomplete > 0 {
            vec![Diagnostic::warn(
                DiagnosticKind::Malformed,
                "man_ori_coordinates",
                format!("{incomplete} point(s) incomplete; using 0.0"),
            )]
        } else {
            Vec::new()
        };
        Loaded::with_warnings(coords, warnings)
    }

    /// Number of `camera_<i>` entries in a nested mapping.
    pub fn camera_entries(value: &Value) -> usize {
        value
            .as_mapping()
            .map(|m| {
                m.keys()
                    .filter_map(Value::as_str)
                    .filter(|k| k.starts_with("camera_"))
                    .count()
            })
            .unwrap_or(0)
    }
}
