//! Joint angle calculation using atan2
//!
//! Angle ABC at vertex B from the directions B→A and B→C, folded into
//! [0, 180]. Any landmark under the confidence minimum makes the angle absent.

use super::landmarks::Landmark;

/// Calculate joint angle in degrees, or None if any landmark is not trusted
///
/// - 180° = fully straight (elbow/knee locked out)
/// - 90° = right-angle bend
pub fn joint_angle(a: &Landmark, b: &Landmark, c: &Landmark, min_confidence: f32) -> Option<f32> {
    if ![a, b, c].iter().all(|lm| lm.is_visible(min_confidence)) {
        return None;
    }

    let ba = a.position() - b.position();
    let bc = c.position() - b.position();

    let mut angle = (bc.y.atan2(bc.x) - ba.y.atan2(ba.x)).to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }

    // NaN coordinates from the estimator
    angle.is_finite().then_some(angle)
}
