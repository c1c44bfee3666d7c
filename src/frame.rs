use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

/// Shared stop flag for a [`FrameLoop`]. Once cancelled it stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Fixed-tick driver: call the frame callback, then sleep out the rest of the
/// tick, until the token is cancelled.
pub struct FrameLoop {
    frame_dt: Duration,
    cancel: CancelToken,
    frames: u64,
}

impl FrameLoop {
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(1, 240);
        Self::with_interval(Duration::from_secs_f64(1.0 / fps as f64))
    }

    pub fn with_interval(frame_dt: Duration) -> Self {
        Self {
            frame_dt,
            cancel: CancelToken::new(),
            frames: 0,
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_dt
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs until cancelled or the callback fails. Returns the number of
    /// frames run so far. No callback starts after cancellation.
    pub fn run<E, F>(&mut self, mut frame: F) -> Result<u64, E>
    where
        F: FnMut(&CancelToken) -> Result<(), E>,
    {
        while !self.cancel.is_cancelled() {
            let started = Instant::now();
            frame(&self.cancel)?;
            self.frames += 1;
            if self.cancel.is_cancelled() {
                break;
            }
            trace!(frame = self.frames, busy_us = started.elapsed().as_micros() as u64, "frame");
            spin_sleep(self.frame_dt, started);
        }
        Ok(self.frames)
    }
}

/// Sleeps until `start + target`, spinning for the last couple of
/// milliseconds to keep frame pacing tight.
pub fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
