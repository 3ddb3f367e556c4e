use core::sync::atomic::{AtomicBool, Ordering};

/// Flag that aborts an in-flight exchange.
///
/// The dispatcher checks the token before each transmission and on every
/// poll of the transport, so it can be set from an interrupt handler or from
/// another thread while `send_and_await_with` is spinning.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Re-arm the token for the next exchange
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
