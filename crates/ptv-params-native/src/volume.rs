use ptv_params_legacy::CriteriaParams;
use serde::{Deserialize, Serialize};

/// Observed volume and correspondence tolerances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumePar {
    pub x_lay: [f64; 2],
    pub z_min_lay: [f64; 2],
    pub z_max_lay: [f64; 2],
    pub cn: f64,
    pub cnx: f64,
    pub cny: f64,
    pub csumg: f64,
    pub eps0: f64,
    pub corrmin: f64,
}

pub fn volume_par(criteria: &CriteriaParams) -> VolumePar {
    VolumePar {
        x_lay: criteria.x_lay,
        z_min_lay: criteria.zmin_lay,
        z_max_lay: criteria.zmax_lay,
        cn: criteria.cn,
        cnx: criteria.cnx,
        cny: criteria.cny,
        csumg: criteria.csumg,
        eps0: criteria.eps0,
        corrmin: criteria.corrmin,
    }
}
