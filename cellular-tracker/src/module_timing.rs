//! Timing constraints of the M95 modem and the tracker board.

use embassy_time::Duration;

/// High time of the power key line to switch the module on
pub fn pwr_on_time() -> Duration {
    Duration::from_millis(1000)
}

/// Time for the status line to come up after the power key pulse
pub fn boot_time() -> Duration {
    Duration::from_secs(5)
}

/// Time to let the regulator discharge before the board is enabled again
pub fn reset_time() -> Duration {
    Duration::from_millis(1000)
}

/// Delay between two network registration queries
pub fn registration_poll_interval() -> Duration {
    Duration::from_secs(1)
}

/// Maximum number of registration queries before giving up
pub const REGISTRATION_POLLS: u8 = 60;

/// Maximum response time of `AT+QIACT`
pub fn context_activation_timeout() -> Duration {
    Duration::from_secs(150)
}

/// Maximum response time of `AT+QIDEACT`
pub fn context_deactivation_timeout() -> Duration {
    Duration::from_secs(40)
}

/// Maximum response time of `AT+QIOPEN`, including DNS resolution
pub fn connect_timeout() -> Duration {
    Duration::from_secs(75)
}

/// Maximum response time of `AT+CMGS` after the message body
pub fn sms_send_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Time for `SEND OK` after a socket payload has been written
pub fn send_confirmation_timeout() -> Duration {
    Duration::from_secs(20)
}
