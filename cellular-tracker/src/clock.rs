use embassy_time::Instant;

/// Monotonic time source used for response deadlines, command cooldown and
/// peripheral timing.
///
/// [`SystemClock`] reads the embassy time driver. Tests and simulators can
/// plug in their own source to make deadline handling deterministic.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by the global `embassy-time` driver.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> Instant {
        (*self).now()
    }
}
