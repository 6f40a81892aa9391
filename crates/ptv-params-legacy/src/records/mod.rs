//! One record type per legacy `.par` file.

mod cal_ori;
mod calibration;
mod criteria;
mod man_ori;
mod misc;
mod ptv;
mod sequence;
mod targ_rec;
mod track;

pub use cal_ori::CalOriParams;
pub use calibration::{DetectPlateParams, OrientParams, SortGridParams};
pub use criteria::CriteriaParams;
pub use man_ori::{ManOriParams, MAN_ORI_POINTS};
pub use misc::{DumbbellParams, ExamineParams, MultiPlaneParams, PftVersionParams, ShakingParams};
pub use ptv::PtvParams;
pub use sequence::SequenceParams;
pub use targ_rec::{TargRecParams, DEFAULT_GVTHRES};
pub use track::TrackingParams;
