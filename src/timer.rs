//! Elapsed-time measurement for the solver runs.

/// A source of seconds since some fixed reference point.
///
/// Readings must be monotonic and non-negative. [`PreciseClock`] reads wall
/// time, so a [`Stopwatch`] on it reports elapsed wall time rather than
/// process CPU time.
pub trait Clock {
    fn now_secs(&self) -> f64;
}

/// High-resolution monotonic wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreciseClock;

impl Clock for PreciseClock {
    fn now_secs(&self) -> f64 {
        time::precise_time_s()
    }
}

/// Measures the wall time elapsed since it was started.
#[derive(Debug, Clone)]
pub struct Stopwatch<C: Clock = PreciseClock> {
    clock: C,
    start: f64,
}

impl Stopwatch<PreciseClock> {
    pub fn start() -> Self {
        Self::with_clock(PreciseClock)
    }
}

impl<C: Clock> Stopwatch<C> {
    pub fn with_clock(clock: C) -> Self {
        let start = clock.now_secs();
        Self { clock, start }
    }

    /// Seconds since the stopwatch was started.
    pub fn elapsed_secs(&self) -> f64 {
        (self.clock.now_secs() - self.start).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeClock<'a>(&'a Cell<f64>);

    impl Clock for FakeClock<'_> {
        fn now_secs(&self) -> f64 {
            self.0.get()
        }
    }

    #[test]
    fn elapsed_measures_from_start() {
        let now = Cell::new(100.0);
        let watch = Stopwatch::with_clock(FakeClock(&now));
        assert_eq!(watch.elapsed_secs(), 0.0);
        now.set(102.5);
        assert_eq!(watch.elapsed_secs(), 2.5);
    }

    #[test]
    fn elapsed_never_negative() {
        let now = Cell::new(5.0);
        let watch = Stopwatch::with_clock(FakeClock(&now));
        now.set(4.0);
        assert_eq!(watch.elapsed_secs(), 0.0);
    }

    #[test]
    fn precise_clock_advances() {
        let watch = Stopwatch::start();
        assert!(watch.elapsed_secs() >= 0.0);
    }
}
