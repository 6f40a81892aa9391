use ptv_params_core::{resize_to, Pad};
use ptv_params_legacy::{TargRecParams, DEFAULT_GVTHRES};
use serde::{Deserialize, Serialize};

/// Particle detection thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetPar {
    /// One grey threshold per camera.
    pub gvthres: Vec<i32>,
    pub discont: i32,
    pub nnmin: i32,
    pub nnmax: i32,
    pub nxmin: i32,
    pub nxmax: i32,
    pub nymin: i32,
    pub nymax: i32,
    pub sumg_min: i32,
    pub cr_sz: i32,
}

impl TargetPar {
    #[inline]
    pub fn num_cams(&self) -> usize {
        self.gvthres.len()
    }
}

/// Build the detection record.
///
/// Without an explicit camera count the thresholds list decides it;
/// otherwise the list is fitted by repeating its last entry.
pub fn target_par(targ_rec: &TargRecParams, num_cams: Option<usize>) -> TargetPar {
    let mut gvthres = targ_rec.gvthres.clone();
    if let Some(n) = num_cams {
        resize_to(&mut gvthres, n, Pad::RepeatLast(DEFAULT_GVTHRES));
    }
    TargetPar {
        gvthres,
        discont: targ_rec.disco,
        nnmin: targ_rec.nnmin,
        nnmax: targ_rec.nnmax,
        nxmin: targ_rec.nxmin,
        nxmax: targ_rec.nxmax,
        nymin: targ_rec.nymin,
        nymax: targ_rec.nymax,
        sumg_min: targ_rec.sumg_min,
        cr_sz: targ_rec.cr_sz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_count_is_inferred_from_thresholds() {
        let targ = TargRecParams {
            gvthres: vec![40, 45, 50],
            ..TargRecParams::default()
        };
        assert_eq!(target_par(&targ, None).num_cams(), 3);

        let fitted = target_par(&targ, Some(4));
        assert_eq!(fitted.gvthres, [40, 45, 50, 50]);
        assert_eq!(fitted.discont, targ.disco);
    }
}
