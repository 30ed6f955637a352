//! Per-frame marker advance
//!
//! One pass over all markers per rendered frame: growth easing, homing, and
//! the rare drift perturbation, in that order. Keeping this a single pass
//! (instead of one scheduled chain per marker) bounds the work per frame to
//! the marker count no matter how many satellites are entering at once.

use rand::Rng;

use super::SatelliteMarker;
use crate::consts::DRIFT_PROBABILITY;

/// Advance every marker by one frame
pub fn advance<R: Rng>(markers: &mut [SatelliteMarker], rng: &mut R) {
    for marker in markers.iter_mut() {
        marker.grow_step();
        marker.home_step();
        if rng.random::<f64>() < DRIFT_PROBABILITY {
            marker.drift(rng);
        }
    }
}
