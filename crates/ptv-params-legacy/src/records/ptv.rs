//! `ptv.par`: camera count, image/calibration names, sensor and media geometry.

use std::path::Path;

use ptv_params_core::{
    is_placeholder, placeholder, resize_to, Diagnostic, DiagnosticKind, FieldCodec,
    MAX_DECLARED_COUNT,
};
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

/// Main control parameters.
///
/// The file starts with `n_img`, which is the authoritative camera count for
/// the whole parameter set. It is not stored as a field: after a read it is
/// `img_name.len()`, and on write the caller's camera count is emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PtvParams {
    /// First image of the sequence, per camera.
    pub img_name: Vec<String>,
    /// Calibration image, per camera.
    pub img_cal: Vec<String>,
    /// High-pass filter the images before detection.
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub hp_flag: bool,
    /// Accept particles seen by every camera only.
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub allcam_flag: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub tiff_flag: bool,
    /// Image width in pixels.
    pub imx: i32,
    /// Image height in pixels.
    pub imy: i32,
    /// Pixel pitch in mm.
    pub pix_x: f64,
    pub pix_y: f64,
    /// Field/frame selection (0 = frame).
    pub chfield: i32,
    /// Refractive index of air.
    pub mmp_n1: f64,
    /// Refractive index of the glass wall.
    pub mmp_n2: f64,
    /// Refractive index of the fluid.
    pub mmp_n3: f64,
    /// Glass wall thickness in mm.
    pub mmp_d: f64,
    /// Images are split into four views of one sensor. Never written to `ptv.par`.
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub splitter: bool,
}

impl Default for PtvParams {
    fn default() -> Self {
        Self {
            img_name: Vec::new(),
            img_cal: Vec::new(),
            hp_flag: true,
            allcam_flag: false,
            tiff_flag: true,
            imx: 1280,
            imy: 1024,
            pix_x: 0.012,
            pix_y: 0.012,
            chfield: 0,
            mmp_n1: 1.0,
            mmp_n2: 1.33,
            mmp_n3: 1.46,
            mmp_d: 6.0,
            splitter: false,
        }
    }
}

impl LegacyRecord for PtvParams {
    const SECTION: &'static str = "ptv";
    const FILENAME: &'static str = "ptv.par";

    fn layout(&mut self, n_cam: usize, codec: &mut dyn FieldCodec) {
        let mut n_img = n_cam.min(MAX_DECLARED_COUNT);
        codec.count("n_img", &mut n_img);

        resize_to(&mut self.img_name, n_img, placeholder());
        resize_to(&mut self.img_cal, n_img, placeholder());
        for (name, cal) in self.img_name.iter_mut().zip(self.img_cal.iter_mut()) {
            codec.text("img_name", name);
            codec.text("img_cal", cal);
        }

        codec.flag("hp_flag", &mut self.hp_flag);
        codec.flag("allcam_flag", &mut self.allcam_flag);
        codec.flag("tiff_flag", &mut self.tiff_flag);
        codec.int("imx", &mut self.imx);
        codec.int("imy", &mut self.imy);
        codec.float("pix_x", &mut self.pix_x);
        codec.float("pix_y", &mut self.pix_y);
        codec.int("chfield", &mut self.chfield);
        codec.float("mmp_n1", &mut self.mmp_n1);
        codec.float("mmp_n2", &mut self.mmp_n2);
        codec.float("mmp_n3", &mut self.mmp_n3);
        codec.float("mmp_d", &mut self.mmp_d);
    }
}

impl PtvParams {
    /// Camera count declared by the file this record was read from.
    #[inline]
    pub fn camera_count(&self) -> usize {
        self.img_name.len()
    }

    /// Warn about referenced image and calibration files that do not exist
    /// under `root` (usually the experiment directory). Placeholder slots
    /// are skipped.
    pub fn check_files(&self, root: &Path) -> Vec<Diagnostic> {
        self.img_name
            .iter()
            .map(|name| ("img_name", name))
            .chain(self.img_cal.iter().map(|name| ("img_cal", name)))
            .filter(|(_, name)| !is_placeholder(name))
            .filter(|(_, name)| !root.join(name).exists())
            .map(|(field, name)| {
                Diagnostic::warn(
                    DiagnosticKind::MissingReference,
                    Self::FILENAME,
                    format!("{field} `{name}` not found under {}", root.display()),
                )
            })
            .collect()
    }
}
