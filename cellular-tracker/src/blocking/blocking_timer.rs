use embassy_time::{Duration, Instant};

use crate::Clock;

pub struct BlockingTimer {
    expires_at: Instant,
}

impl BlockingTimer {
    pub fn after(clock: &impl Clock, duration: Duration) -> Self {
        Self {
            expires_at: clock.now() + duration,
        }
    }

    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        self.expires_at <= clock.now()
    }

    pub fn wait(self, clock: &impl Clock) {
        loop {
            if self.is_expired(clock) {
                break;
            }
        }
    }
}
