// PedoWatch — Distance Estimator
//
// distance = floor(steps × height_cm × STRIDE_FACTOR), evaluated in integer
// fixed point so the floor is exact (no 703.99999 surprises from f64).

use crate::config::{STRIDE_FACTOR_DEN, STRIDE_FACTOR_NUM};

/// Estimated distance in whole metres for `step_count` steps by a user of
/// the given height. Heights are validated upstream; any input is accepted
/// here and simply multiplied out.
pub fn estimate_distance(step_count: u32, height_metres: u16, height_centimetres: u16) -> u64 {
    let height_cm = u64::from(height_metres) * 100 + u64::from(height_centimetres);
    u64::from(step_count) * height_cm * STRIDE_FACTOR_NUM / STRIDE_FACTOR_DEN
}
