use crate::motion::{sine_in_out, yoyo};
use serde::Serialize;
use std::time::Duration;

const BREATH_HALF_PERIOD: Duration = Duration::from_secs(2);
const GLOW_HALF_PERIOD: Duration = Duration::from_millis(1500);
const BOB_PERIOD: Duration = Duration::from_secs(3);
const ROTATION_PERIOD: Duration = Duration::from_secs(20);

/// Decorative avatar motion. Independent of the turn state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmbientPose {
    pub breath_scale: f32,
    pub glow_opacity: f32,
    pub glow_scale: f32,
    pub border_rotation_deg: f32,
    pub face_offset_y: f32,
}

pub fn ambient_pose(elapsed: Duration) -> AmbientPose {
    let breath = sine_in_out(yoyo(elapsed, BREATH_HALF_PERIOD));
    let glow = sine_in_out(yoyo(elapsed, GLOW_HALF_PERIOD));
    let turn = (elapsed.as_secs_f32() / ROTATION_PERIOD.as_secs_f32()).fract();
    let bob = sine_in_out(yoyo(elapsed, BOB_PERIOD / 2));

    AmbientPose {
        breath_scale: 1.0 + 0.03 * breath,
        glow_opacity: 0.3 + 0.2 * glow,
        glow_scale: 1.0 + 0.1 * glow,
        border_rotation_deg: 360.0 * turn,
        face_offset_y: -5.0 * bob,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_rest() {
        let pose = ambient_pose(Duration::ZERO);
        assert_eq!(pose.breath_scale, 1.0);
        assert_eq!(pose.glow_opacity, 0.3);
        assert_eq!(pose.border_rotation_deg, 0.0);
        assert_eq!(pose.face_offset_y, 0.0);
    }

    #[test]
    fn peaks_at_half_periods() {
        let pose = ambient_pose(Duration::from_secs(2));
        assert!((pose.breath_scale - 1.03).abs() < 1e-4);

        let pose = ambient_pose(Duration::from_millis(1500));
        assert!((pose.glow_opacity - 0.5).abs() < 1e-4);
        assert!((pose.glow_scale - 1.1).abs() < 1e-4);
        assert!((pose.face_offset_y + 5.0).abs() < 1e-4);
    }

    #[test]
    fn border_completes_a_turn_every_twenty_seconds() {
        let pose = ambient_pose(Duration::from_secs(5));
        assert!((pose.border_rotation_deg - 90.0).abs() < 1e-3);
        let pose = ambient_pose(Duration::from_secs(25));
        assert!((pose.border_rotation_deg - 90.0).abs() < 1e-3);
    }
}
