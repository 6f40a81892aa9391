//! Per-camera calibration: exterior orientation, interior orientation,
//! lens distortion and glass vector, read from an `.ori`/`.addpar` pair.
//!
//! `.ori` layout (whitespace separated, 21 numbers):
//!
//! ```text
//! x0 y0 z0
//! omega phi kappa
//!
//! dm00 dm01 dm02
//! dm10 dm11 dm12
//! dm20 dm21 dm22
//!
//! xh yh
//! cc
//!
//! gx gy gz
//! ```
//!
//! The glass vector is optional and defaults to `(0, 0, 1)`. `.addpar`
//! holds `k1 k2 k3 p1 p2 scx she`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use nalgebra::{Matrix3, Point3, Vector3};
use ptv_params_core::parse_float;
use serde::{Deserialize, Serialize};

use crate::CalibrationError;

const ORI_REQUIRED: usize = 18;
const ADDPAR_VALUES: usize = 7;

/// Camera position, orientation angles (radians) and rotation matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exterior {
    pub position: Point3<f64>,
    pub omega: f64,
    pub phi: f64,
    pub kappa: f64,
    pub dm: Matrix3<f64>,
}

impl Default for Exterior {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            omega: 0.0,
            phi: 0.0,
            kappa: 0.0,
            dm: Matrix3::identity(),
        }
    }
}

/// Primary point `(xh, yh)` and principal distance `cc`, in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Interior {
    pub xh: f64,
    pub yh: f64,
    pub cc: f64,
}

/// Radial (`k1..k3`) and decentering (`p1`, `p2`) distortion, affine
/// scale `scx` and shear `she`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddPar {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub p1: f64,
    pub p2: f64,
    pub scx: f64,
    pub she: f64,
}

impl Default for AddPar {
    fn default() -> Self {
        Self {
            k1: 0.0,
            k2: 0.0,
            k3: 0.0,
            p1: 0.0,
            p2: 0.0,
            scx: 1.0,
            she: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub ext: Exterior,
    pub int: Interior,
    pub added: AddPar,
    pub glass: Vector3<f64>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            ext: Exterior::default(),
            int: Interior::default(),
            added: AddPar::default(),
            glass: Vector3::z(),
        }
    }
}

/// Rotation matrix for omega/phi/kappa angles in radians.
pub fn rotation_matrix(omega: f64, phi: f64, kappa: f64) -> Matrix3<f64> {
    let (so, co) = omega.sin_cos();
    let (sp, cp) = phi.sin_cos();
    let (sk, ck) = kappa.sin_cos();
    Matrix3::new(
        cp * ck,
        -cp * sk,
        sp,
        co * sk + so * sp * ck,
        co * ck - so * sp * sk,
        -so * cp,
        so * sk - co * sp * ck,
        so * ck + co * sp * sk,
        co * cp,
    )
}

fn read_numbers(path: &Path) -> Result<Vec<f64>, CalibrationError> {
    let text = fs::read_to_string(path).map_err(|source| CalibrationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    text.split_whitespace()
        .map(|token| {
            parse_float(token).map_err(|_| CalibrationError::NotANumber {
                path: path.to_path_buf(),
                token: token.to_string(),
            })
        })
        .collect()
}

fn require(path: &Path, values: &[f64], expected: usize) -> Result<(), CalibrationError> {
    if values.len() < expected {
        return Err(CalibrationError::Truncated {
            path: path.to_path_buf(),
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

fn write_file(path: &Path, text: &str) -> Result<(), CalibrationError> {
    fs::write(path, text).map_err(|source| CalibrationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl Calibration {
    /// Read an `.ori` file and, when given, its `.addpar` companion.
    /// Without an `.addpar` path the distortion terms stay at their defaults.
    pub fn from_files(ori: &Path, addpar: Option<&Path>) -> Result<Self, CalibrationError> {
        let v = read_numbers(ori)?;
        require(ori, &v, ORI_REQUIRED)?;

        let mut cal = Self {
            ext: Exterior {
                position: Point3::new(v[0], v[1], v[2]),
                omega: v[3],
                phi: v[4],
                kappa: v[5],
                dm: Matrix3::from_row_slice(&v[6..15]),
            },
            int: Interior {
                xh: v[15],
                yh: v[16],
                cc: v[17],
            },
            ..Self::default()
        };
        if let Some(&[gx, gy, gz]) = v.get(ORI_REQUIRED..ORI_REQUIRED + 3) {
            cal.glass = Vector3::new(gx, gy, gz);
        }

        if let Some(addpar) = addpar {
            let a = read_numbers(addpar)?;
            require(addpar, &a, ADDPAR_VALUES)?;
            cal.added = AddPar {
                k1: a[0],
                k2: a[1],
                k3: a[2],
                p1: a[3],
                p2: a[4],
                scx: a[5],
                she: a[6],
            };
        }
        Ok(cal)
    }

    pub fn ori_string(&self) -> String {
        let e = &self.ext;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:.8} {:.8} {:.8}\n{:.8} {:.8} {:.8}\n",
            e.position.x, e.position.y, e.position.z, e.omega, e.phi, e.kappa
        );
        for row in e.dm.row_iter() {
            let _ = writeln!(out, "{:.7} {:.7} {:.7}", row[0], row[1], row[2]);
        }
        let _ = writeln!(
            out,
            "\n{:.4} {:.4}\n{:.4}\n",
            self.int.xh, self.int.yh, self.int.cc
        );
        let _ = writeln!(
            out,
            "{:.15} {:.15} {:.15}",
            self.glass.x, self.glass.y, self.glass.z
        );
        out
    }

    pub fn addpar_string(&self) -> String {
        let a = &self.added;
        format!(
            "{:.8} {:.8} {:.8} {:.8} {:.8} {:.8} {:.8}\n",
            a.k1, a.k2, a.k3, a.p1, a.p2, a.scx, a.she
        )
    }

    pub fn write(&self, ori: &Path, addpar: &Path) -> Result<(), CalibrationError> {
        write_file(ori, &self.ori_string())?;
        write_file(addpar, &self.addpar_string())
    }

    #[inline]
    pub fn position(&self) -> Point3<f64> {
        self.ext.position
    }

    pub fn set_position(&mut self, position: Point3<f64>) {
        self.ext.position = position;
    }

    /// `(omega, phi, kappa)` in radians.
    #[inline]
    pub fn angles(&self) -> Vector3<f64> {
        Vector3::new(self.ext.omega, self.ext.phi, self.ext.kappa)
    }

    /// Set the angles and recompute the rotation matrix.
    pub fn set_angles(&mut self, omega: f64, phi: f64, kappa: f64) {
        self.ext.omega = omega;
        self.ext.phi = phi;
        self.ext.kappa = kappa;
        self.ext.dm = rotation_matrix(omega, phi, kappa);
    }

    #[inline]
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.ext.dm
    }

    /// `(xh, yh, cc)`.
    #[inline]
    pub fn primary_point(&self) -> Vector3<f64> {
        Vector3::new(self.int.xh, self.int.yh, self.int.cc)
    }

    pub fn set_primary_point(&mut self, xh: f64, yh: f64, cc: f64) {
        self.int = Interior { xh, yh, cc };
    }

    #[inline]
    pub fn radial_distortion(&self) -> Vector3<f64> {
        Vector3::new(self.added.k1, self.added.k2, self.added.k3)
    }

    #[inline]
    pub fn decentering(&self) -> [f64; 2] {
        [self.added.p1, self.added.p2]
    }

    /// `[scx, she]`.
    #[inline]
    pub fn affine(&self) -> [f64; 2] {
        [self.added.scx, self.added.she]
    }

    #[inline]
    pub fn glass_vec(&self) -> Vector3<f64> {
        self.glass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ORI: &str = "105.2632 102.7458 403.8822\n\
        -0.2383291 0.2442810 0.0552577\n\n\
        0.9688305 -0.0535899 0.2418587\n\
        -0.0033422 0.9734041 0.2290704\n\
        -0.2477021 -0.2227387 0.9428845\n\n\
        -2.4742 3.2567\n100.0000\n\n\
        0.000000000000000 0.000000000000000 1.000000000000000\n";
    const ADDPAR: &str = "0.00001 -0.00000002 0 0.0001 0.0002 1.0001 0.001\n";

    #[test]
    fn reads_ori_and_addpar() {
        let dir = tempfile::tempdir().unwrap();
        let (ori, addpar) = (dir.path().join("cam1.ori"), dir.path().join("cam1.addpar"));
        fs::write(&ori, ORI).unwrap();
        fs::write(&addpar, ADDPAR).unwrap();

        let cal = Calibration::from_files(&ori, Some(&addpar)).unwrap();
        assert_relative_eq!(cal.position(), Point3::new(105.2632, 102.7458, 403.8822));
        assert_relative_eq!(cal.angles().y, 0.2442810);
        assert_relative_eq!(cal.rotation_matrix()[(2, 1)], -0.2227387);
        assert_relative_eq!(cal.primary_point(), Vector3::new(-2.4742, 3.2567, 100.0));
        assert_relative_eq!(cal.affine()[0], 1.0001);
        assert_eq!(cal.glass_vec(), Vector3::z());
    }

    #[test]
    fn glass_vector_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let ori = dir.path().join("cam.ori");
        let trimmed: String = ORI.lines().take(9).collect::<Vec<_>>().join("\n");
        fs::write(&ori, trimmed).unwrap();

        let cal = Calibration::from_files(&ori, None).unwrap();
        assert_eq!(cal.glass_vec(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(cal.added, AddPar::default());
    }

    #[test]
    fn short_ori_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ori = dir.path().join("cam.ori");
        fs::write(&ori, "1 2 3\n0 0 0\n").unwrap();
        assert!(matches!(
            Calibration::from_files(&ori, None),
            Err(CalibrationError::Truncated { found: 6, .. })
        ));
        assert!(matches!(
            Calibration::from_files(&dir.path().join("missing.ori"), None),
            Err(CalibrationError::Io { .. })
        ));
    }

    #[test]
    fn set_angles_recomputes_an_orthonormal_matrix() {
        let mut cal = Calibration::default();
        cal.set_angles(0.0, 0.0, 0.0);
        assert_relative_eq!(cal.rotation_matrix(), Matrix3::identity());

        cal.set_angles(-0.2383291, 0.2442810, 0.0552577);
        let dm = cal.rotation_matrix();
        assert_relative_eq!(dm * dm.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(dm[(0, 2)], 0.2442810_f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(dm[(0, 0)], 0.9688305, epsilon = 1e-6);
    }

    #[test]
    fn written_files_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let (ori, addpar) = (dir.path().join("a.ori"), dir.path().join("a.addpar"));
        let mut cal = Calibration::default();
        cal.set_position(Point3::new(-10.5, 3.25, 600.0));
        cal.set_angles(0.1, -0.2, 0.3);
        cal.set_primary_point(0.5, -0.25, 55.0);
        cal.write(&ori, &addpar).unwrap();

        let back = Calibration::from_files(&ori, Some(&addpar)).unwrap();
        assert_relative_eq!(back.position(), cal.position(), epsilon = 1e-8);
        assert_relative_eq!(back.angles(), cal.angles(), epsilon = 1e-8);
        assert_relative_eq!(back.rotation_matrix(), cal.rotation_matrix(), epsilon = 1e-7);
        assert_relative_eq!(back.primary_point(), cal.primary_point(), epsilon = 1e-4);
        assert_eq!(back.affine(), [1.0, 0.0]);
    }
}
