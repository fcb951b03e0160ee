//! Time source and cancellation for the sampling and playback loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// Monotonic time source with a wait primitive.
///
/// Production code uses [`SystemClock`]; tests substitute a simulated clock
/// so that schedules can be checked without sleeping.
pub trait Clock: Send + Sync {
    /// Nanoseconds since an arbitrary fixed origin.
    fn now_ns(&self) -> u64;

    /// Blocks until `now_ns() >= deadline_ns`. Returns immediately when the
    /// deadline has already passed.
    fn sleep_until(&self, deadline_ns: u64);

    /// Blocks for `duration_ns`.
    fn sleep_for(&self, duration_ns: u64) {
        self.sleep_until(self.now_ns().saturating_add(duration_ns));
    }
}

/// Wall-clock implementation backed by [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

fn process_origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

impl Clock for SystemClock {
    fn now_ns(&self) -> u64 {
        process_origin().elapsed().as_nanos() as u64
    }

    fn sleep_until(&self, deadline_ns: u64) {
        let now = self.now_ns();
        if deadline_ns > now {
            std::thread::sleep(Duration::from_nanos(deadline_ns - now));
        }
    }
}

/// Cooperative stop flag shared between a loop and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
