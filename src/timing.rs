use rand::Rng;
use std::time::Duration;

/// Source of the randomized component of human-like waits.
///
/// Injected so tests can substitute a deterministic source instead of
/// depending on ambient RNG state.
pub trait JitterSource: Send {
    /// A value in `[0, 1)`, scaled by the caller onto its jitter window.
    fn sample(&mut self) -> f64;

    /// Sleep for `base` plus a random share of `jitter`.
    fn wait(&mut self, base: Duration, jitter: Duration) {
        let extra = jitter.mul_f64(self.sample());
        std::thread::sleep(base + extra);
    }
}

/// Production jitter source backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct SystemJitter;

impl JitterSource for SystemJitter {
    fn sample(&mut self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

/// Deterministic jitter source for tests; always returns the same value
/// and never actually sleeps.
#[derive(Debug)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&mut self) -> f64 {
        self.0
    }

    fn wait(&mut self, _base: Duration, _jitter: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_jitter_in_range() {
        let mut jitter = SystemJitter;
        for _ in 0..100 {
            let v = jitter.sample();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_fixed_jitter_is_constant() {
        let mut jitter = FixedJitter(0.5);
        assert_eq!(jitter.sample(), 0.5);
        assert_eq!(jitter.sample(), 0.5);
    }

    #[test]
    fn test_fixed_jitter_wait_returns_immediately() {
        let mut jitter = FixedJitter(0.9);
        let start = std::time::Instant::now();
        jitter.wait(Duration::from_secs(5), Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
