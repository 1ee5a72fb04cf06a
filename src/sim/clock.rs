use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::sim::Clock;

/// Simulation clock for lockstep operation. The tick loop advances it;
/// `unlock_time` (called when a tick publishes) credits the pacing side,
/// which consumes credits through `wait_unlocked`.
#[derive(Debug, Default)]
pub struct LockstepClock {
    time_us: AtomicU64,
    pending_unlocks: Mutex<u64>,
    unlocked: Condvar,
}

impl LockstepClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance simulated time by one step
    pub fn advance(&self, dt_us: u64) {
        self.time_us.fetch_add(dt_us, Ordering::SeqCst);
    }

    /// Consume one unlock credit, waiting up to `timeout` for it. Returns
    /// false on timeout, which callers treat as a stalled autopilot.
    pub fn wait_unlocked(&self, timeout: Duration) -> bool {
        let guard = self.pending_unlocks.lock().unwrap();
        let (mut guard, result) = self
            .unlocked
            .wait_timeout_while(guard, timeout, |pending| *pending == 0)
            .unwrap();
        if result.timed_out() {
            return false;
        }
        *guard -= 1;
        true
    }
}

impl Clock for LockstepClock {
    fn current_time_us(&self) -> u64 {
        self.time_us.load(Ordering::SeqCst)
    }

    fn unlock_time(&self) {
        let mut pending = self.pending_unlocks.lock().unwrap();
        *pending += 1;
        self.unlocked.notify_all();
    }
}

/// Free-running clock mapped to wall time, for runs without lockstep
#[derive(Debug, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn current_time_us(&self) -> u64 {
        chrono::Utc::now().timestamp_micros().max(0) as u64
    }

    fn unlock_time(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_advance_accumulates() {
        let clock = LockstepClock::new();
        clock.advance(10_000);
        clock.advance(10_000);
        assert_eq!(clock.current_time_us(), 20_000);
    }

    #[test]
    fn test_wait_times_out_without_unlock() {
        let clock = LockstepClock::new();
        assert!(!clock.wait_unlocked(Duration::from_millis(10)));
    }

    #[test]
    fn test_unlock_credit_is_consumed() {
        let clock = LockstepClock::new();
        clock.unlock_time();
        assert!(clock.wait_unlocked(Duration::from_millis(10)));
        assert!(!clock.wait_unlocked(Duration::from_millis(10)));
    }

    #[test]
    fn test_unlock_wakes_waiter_across_threads() {
        let clock = Arc::new(LockstepClock::new());
        let waiter = Arc::clone(&clock);
        let handle = thread::spawn(move || waiter.wait_unlocked(Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(20));
        clock.unlock_time();
        assert!(handle.join().unwrap());
    }
}
