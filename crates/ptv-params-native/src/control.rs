use ptv_params_core::{resize_to, placeholder};
use ptv_params_legacy::{CalOriParams, PtvParams};
use serde::{Deserialize, Serialize};

use crate::NativeConfigError;

/// Refractive media between camera and object: air `n1`, glass layers
/// `n2` of thickness `d`, water `n3`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultimediaPar {
    pub n1: f64,
    pub n2: Vec<f64>,
    pub d: Vec<f64>,
    pub n3: f64,
}

impl Default for MultimediaPar {
    fn default() -> Self {
        Self {
            n1: 1.0,
            n2: vec![1.0],
            d: vec![0.0],
            n3: 1.0,
        }
    }
}

impl MultimediaPar {
    #[inline]
    pub fn nlay(&self) -> usize {
        self.n2.len()
    }

    /// True when every medium has the same index, i.e. no refraction.
    pub fn is_uniform(&self) -> bool {
        self.n2.iter().all(|&n| n == self.n1) && self.n3 == self.n1
    }
}

/// Image geometry and processing flags shared by every camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPar {
    pub num_cams: usize,
    pub img_base_name: Vec<String>,
    pub cal_img_base_name: Vec<String>,
    pub hp_flag: bool,
    pub allcam_flag: bool,
    pub tiff_flag: bool,
    pub imx: i32,
    pub imy: i32,
    pub pix_x: f64,
    pub pix_y: f64,
    pub chfield: i32,
    pub mm: MultimediaPar,
}

impl ControlPar {
    /// Image size in millimetres on the sensor.
    pub fn sensor_size(&self) -> (f64, f64) {
        (self.imx as f64 * self.pix_x, self.imy as f64 * self.pix_y)
    }
}

/// Build the control record.
///
/// Calibration base names come from `cal_ori.img_cal_name` and must have
/// exactly `num_cams` entries; image names are fitted to `num_cams`.
pub fn control_par(
    ptv: &PtvParams,
    cal_ori: &CalOriParams,
    num_cams: usize,
) -> Result<ControlPar, NativeConfigError> {
    if cal_ori.img_cal_name.len() != num_cams {
        return Err(NativeConfigError::LengthMismatch {
            field: "cal_ori.img_cal_name",
            expected: num_cams,
            got: cal_ori.img_cal_name.len(),
        });
    }
    let mut img_base_name = ptv.img_name.clone();
    if img_base_name.len() != num_cams {
        log::debug!(
            "fitting {} image names to {num_cams} camera(s)",
            img_base_name.len()
        );
        resize_to(&mut img_base_name, num_cams, placeholder());
    }

    Ok(ControlPar {
        num_cams,
        img_base_name,
        cal_img_base_name: cal_ori.img_cal_name.clone(),
        hp_flag: ptv.hp_flag,
        allcam_flag: ptv.allcam_flag,
        tiff_flag: ptv.tiff_flag,
        imx: ptv.imx,
        imy: ptv.imy,
        pix_x: ptv.pix_x,
        pix_y: ptv.pix_y,
        chfield: ptv.chfield,
        mm: MultimediaPar {
            n1: ptv.mmp_n1,
            n2: vec![ptv.mmp_n2],
            d: vec![ptv.mmp_d],
            n3: ptv.mmp_n3,
        },
    })
}
