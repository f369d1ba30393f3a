use crate::motion::{power2_out, sine_in_out, yoyo};
use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

pub const BAR_COUNT: usize = 5;
/// Scale the bars settle at while nobody is speaking.
pub const BAR_REST: f32 = 0.3;
/// Upper bound of the random extra height on top of a scale of 1.
pub const BAR_SPREAD: f32 = 1.5;
pub const BAR_MAX: f32 = 1.0 + BAR_SPREAD;

const BASE_HALF_PERIOD: Duration = Duration::from_millis(150);
const STAGGER: Duration = Duration::from_millis(50);

/// Resting height of bar `index` in pixels, before scaling.
pub fn base_height(index: usize) -> f32 {
    8.0 + 4.0 * index as f32
}

#[derive(Debug, Clone, Copy)]
struct BarMotion {
    peak: f32,
    half_period: Duration,
    delay: Duration,
}

#[derive(Debug, Clone, Copy)]
enum BarMode {
    Resting,
    /// `from` holds where each bar stood when speaking started, so the
    /// first rise picks up from a partly decayed height.
    Active { since: Instant, from: [f32; BAR_COUNT] },
    Decaying { since: Instant, from: [f32; BAR_COUNT] },
}

/// The "sound activity" bars under the avatar.
#[derive(Debug, Clone)]
pub struct SoundBars {
    motions: [BarMotion; BAR_COUNT],
    mode: BarMode,
    decay: Duration,
}

impl SoundBars {
    pub fn new(decay: Duration) -> Self {
        Self {
            motions: [BarMotion {
                peak: 1.0,
                half_period: BASE_HALF_PERIOD,
                delay: Duration::ZERO,
            }; BAR_COUNT],
            mode: BarMode::Resting,
            decay,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, BarMode::Active { .. })
    }

    /// Start or stop the animation. New random motion is drawn on every
    /// start; both starting and stopping continue from wherever the bars
    /// currently are.
    pub fn set_speaking<R: Rng>(&mut self, speaking: bool, now: Instant, rng: &mut R) {
        match (speaking, self.is_active()) {
            (true, false) => {
                let from = self.amplitudes(now);
                for (i, motion) in self.motions.iter_mut().enumerate() {
                    motion.peak = 1.0 + rng.gen_range(0.0..BAR_SPREAD);
                    motion.half_period =
                        BASE_HALF_PERIOD + BASE_HALF_PERIOD.mul_f32(rng.gen_range(0.0..1.0));
                    motion.delay = STAGGER * i as u32;
                }
                self.mode = BarMode::Active { since: now, from };
            }
            (false, true) => {
                let from = self.amplitudes(now);
                self.mode = BarMode::Decaying { since: now, from };
            }
            _ => {}
        }
    }

    /// Current scale of every bar, each within `BAR_REST..=BAR_MAX`.
    pub fn amplitudes(&self, now: Instant) -> [f32; BAR_COUNT] {
        match self.mode {
            BarMode::Resting => [BAR_REST; BAR_COUNT],
            BarMode::Active { since, from } => {
                let elapsed = now.saturating_duration_since(since);
                let mut out = [BAR_REST; BAR_COUNT];
                for ((slot, motion), start) in out.iter_mut().zip(self.motions.iter()).zip(from) {
                    let t = elapsed.saturating_sub(motion.delay);
                    let p = sine_in_out(yoyo(t, motion.half_period));
                    // Every swing after the first one starts from rest.
                    let base = if t < motion.half_period { start } else { BAR_REST };
                    *slot = base + (motion.peak - base) * p;
                }
                out
            }
            BarMode::Decaying { since, from } => {
                let elapsed = now.saturating_duration_since(since);
                if self.decay.is_zero() || elapsed >= self.decay {
                    return [BAR_REST; BAR_COUNT];
                }
                let p = power2_out(elapsed.as_secs_f32() / self.decay.as_secs_f32());
                from.map(|a| a + (BAR_REST - a) * p)
            }
        }
    }
}
