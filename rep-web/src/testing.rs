//! Synthetic poses for unit tests

use crate::pose::*;

const SHIN: f32 = 0.2;
const THIGH: f32 = 0.2;
const FOREARM: f32 = 0.15;
const UPPER_ARM: f32 = 0.15;
const BAR_Y: f32 = 0.2;

/// Side view of both legs with the given knee angle, feet at `ankle_y`.
/// Every landmark carries `confidence`.
pub fn jump_pose(knee_angle: f32, ankle_y: f32, confidence: f32) -> PoseFrame {
    uneven_jump_pose(knee_angle, knee_angle, ankle_y, confidence)
}

/// Same as `jump_pose` with a separate angle per knee
pub fn uneven_jump_pose(
    left_knee: f32,
    right_knee: f32,
    ankle_y: f32,
    confidence: f32,
) -> PoseFrame {
    let mut pose = PoseFrame::empty(0.0);

    for (ankle, knee, hip, shoulder, x, sx, angle) in [
        (LEFT_ANKLE, LEFT_KNEE, LEFT_HIP, LEFT_SHOULDER, 0.4, 0.42, left_knee),
        (RIGHT_ANKLE, RIGHT_KNEE, RIGHT_HIP, RIGHT_SHOULDER, 0.6, 0.58, right_knee),
    ] {
        let theta = f32::to_radians(angle);
        let knee_y = ankle_y - SHIN;
        let hip_x = x + THIGH * theta.sin();
        let hip_y = knee_y + THIGH * theta.cos();
        pose.landmarks[ankle] = Landmark::new(x, ankle_y, confidence);
        pose.landmarks[knee] = Landmark::new(x, knee_y, confidence);
        pose.landmarks[hip] = Landmark::new(hip_x, hip_y, confidence);
        pose.landmarks[shoulder] = Landmark::new(sx, hip_y - 0.3, confidence);
    }
    pose
}

pub fn standing_pose(ankle_y: f32, confidence: f32) -> PoseFrame {
    jump_pose(180.0, ankle_y, confidence)
}

/// Front view of a hang from a bar at y = 0.2 with the given elbow angles
pub fn hang_pose(left_elbow: f32, right_elbow: f32, chin_over_bar: bool) -> PoseFrame {
    let mut pose = PoseFrame::empty(0.0);

    for (wrist, elbow, shoulder, x, side, angle) in [
        (LEFT_WRIST, LEFT_ELBOW, LEFT_SHOULDER, 0.4, 1.0, left_elbow),
        (RIGHT_WRIST, RIGHT_ELBOW, RIGHT_SHOULDER, 0.6, -1.0, right_elbow),
    ] {
        let theta = angle.to_radians();
        let elbow_y = BAR_Y + FOREARM;
        pose.landmarks[wrist] = Landmark::new(x, BAR_Y, 0.9);
        pose.landmarks[elbow] = Landmark::new(x, elbow_y, 0.9);
        pose.landmarks[shoulder] = Landmark::new(
            x + side * UPPER_ARM * theta.sin(),
            elbow_y - UPPER_ARM * theta.cos(),
            0.9,
        );
    }

    let nose_y = if chin_over_bar {
        BAR_Y
    } else {
        pose.mean_y(LEFT_SHOULDER, RIGHT_SHOULDER) - 0.1
    };
    pose.landmarks[NOSE] = Landmark::new(0.5, nose_y, 0.9);
    pose
}
