//! Easing curves and tweens shared by the cosmetic animations.
//!
//! Everything here is a pure function of time so frame loops can sample it at
//! whatever cadence they run.

use std::f32::consts::PI;
use std::time::Duration;
use tokio::time::Instant;

pub type Ease = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

pub fn sine_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    -((PI * t).cos() - 1.0) / 2.0
}

pub fn power2_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Overshoots slightly past 1 before settling, like a spring.
pub fn back_out(t: f32) -> f32 {
    const C1: f32 = 1.7;
    const C3: f32 = C1 + 1.0;
    let t = t.clamp(0.0, 1.0) - 1.0;
    1.0 + C3 * t * t * t + C1 * t * t
}

/// Progress of a repeating there-and-back motion: 0 → 1 over one half
/// period, then 1 → 0 over the next.
pub fn yoyo(elapsed: Duration, half_period: Duration) -> f32 {
    if half_period.is_zero() {
        return 0.0;
    }
    let phase = (elapsed.as_secs_f32() / half_period.as_secs_f32()) % 2.0;
    if phase <= 1.0 { phase } else { 2.0 - phase }
}

/// A one-shot interpolation between two values.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, started: Instant, duration: Duration, ease: Ease) -> Self {
        Self {
            from,
            to,
            started,
            duration,
            ease,
        }
    }

    /// A tween that is already resting at `value`.
    pub fn settled(value: f32, now: Instant) -> Self {
        Self::new(value, value, now, Duration::ZERO, linear)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn value(&self, now: Instant) -> f32 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.ease)(t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Restart towards a new target from wherever the tween is now.
    pub fn retarget(&mut self, to: f32, now: Instant) {
        self.from = self.value(now);
        self.to = to;
        self.started = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_their_endpoints() {
        for ease in [linear as Ease, sine_in_out, power2_out, back_out] {
            assert!(ease(0.0).abs() < 1e-6);
            assert!((ease(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn back_out_overshoots() {
        assert!(back_out(0.7) > 1.0);
    }

    #[test]
    fn yoyo_goes_there_and_back() {
        let half = Duration::from_millis(100);
        assert!(yoyo(Duration::ZERO, half).abs() < 1e-6);
        assert!((yoyo(Duration::from_millis(100), half) - 1.0).abs() < 1e-3);
        assert!((yoyo(Duration::from_millis(150), half) - 0.5).abs() < 1e-3);
        assert!(yoyo(Duration::from_millis(200), half).abs() < 1e-3);
    }

    #[tokio::test(start_paused = true)]
    async fn tween_reaches_target_after_duration() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 10.0, start, Duration::from_millis(300), power2_out);

        assert_eq!(tween.value(start), 0.0);
        assert!(tween.value(start + Duration::from_millis(150)) > 5.0);
        assert_eq!(tween.value(start + Duration::from_millis(300)), 10.0);
        assert!(tween.is_finished(start + Duration::from_secs(1)));
    }
}
