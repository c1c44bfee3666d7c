use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use tracing::warn;

/// Floor for the cruising speed. Non-finite and smaller inputs land here.
pub const MIN_SPEED: f32 = 0.01;

pub fn sanitize_speed(speed: f32) -> f32 {
    if speed.is_finite() && speed >= MIN_SPEED {
        speed
    } else {
        MIN_SPEED
    }
}

#[derive(Debug)]
struct Shared {
    speed: AtomicU32,
    accelerating: AtomicBool,
}

/// Handle to the two values the outside world may change while the field is
/// animating. Clones share state; writes are picked up by the next frame.
#[derive(Clone, Debug)]
pub struct Controls {
    inner: Arc<Shared>,
}

impl Controls {
    pub fn new(speed: f32, accelerating: bool) -> Self {
        let speed = checked(speed);
        Self {
            inner: Arc::new(Shared {
                speed: AtomicU32::new(speed.to_bits()),
                accelerating: AtomicBool::new(accelerating),
            }),
        }
    }

    pub fn speed(&self) -> f32 {
        f32::from_bits(self.inner.speed.load(Ordering::Relaxed))
    }

    pub fn set_speed(&self, speed: f32) {
        self.inner
            .speed
            .store(checked(speed).to_bits(), Ordering::Relaxed);
    }

    pub fn accelerating(&self) -> bool {
        self.inner.accelerating.load(Ordering::Relaxed)
    }

    /// Returns the previous value.
    pub fn set_accelerating(&self, on: bool) -> bool {
        self.inner.accelerating.swap(on, Ordering::Relaxed)
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

fn checked(speed: f32) -> f32 {
    let clean = sanitize_speed(speed);
    if clean != speed {
        warn!(requested = speed, used = clean, "speed out of range, clamped");
    }
    clean
}
