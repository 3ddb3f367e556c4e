use core::fmt::Write as _;

use embassy_time::Duration;
use heapless::{String, Vec};

use crate::Error;

/// Capacity of a composed command, including the line terminator.
pub const COMMAND_CAPACITY: usize = 100;

/// Command line termination character S3
pub const LINE_TERM_CHAR: u8 = b'\r';

/// Ctrl-Z, terminates a text message payload
pub const CTRL_Z: u8 = 0x1A;

/// A composed, bounded control command (`AT<command>\r`) ready to be handed
/// to a [`Dispatcher`](crate::blocking::Dispatcher).
///
/// Raw payloads for an open data session do not go through `Command`; they
/// are wrapped in a [`Payload`] instead.
///
/// Construction fails with [`Error::ComposeOverflow`] if the framed command
/// does not fit in [`COMMAND_CAPACITY`] bytes, so oversized commands never
/// reach the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    bytes: Vec<u8, COMMAND_CAPACITY>,
    timeout: Option<Duration>,
    attempts: Option<u8>,
}

impl Command {
    /// Control command, e.g. `Command::new("AT+CSQ")`. The line terminator is
    /// appended.
    pub fn new(cmd: &str) -> Result<Self, Error> {
        Self::control(cmd.as_bytes())
    }

    /// Control command built from a format template.
    ///
    /// ```
    /// use cellular_tracker::Command;
    ///
    /// let cmd = Command::compose(format_args!("AT+CPIN={}", "1234")).unwrap();
    /// assert_eq!(cmd.as_bytes(), b"AT+CPIN=1234\r");
    /// ```
    pub fn compose(args: core::fmt::Arguments<'_>) -> Result<Self, Error> {
        let mut s = String::<COMMAND_CAPACITY>::new();
        s.write_fmt(args).map_err(|_| Error::ComposeOverflow)?;
        Self::control(s.as_bytes())
    }

    fn control(cmd: &[u8]) -> Result<Self, Error> {
        let mut bytes: Vec<u8, COMMAND_CAPACITY> = Vec::new();
        bytes
            .extend_from_slice(cmd)
            .map_err(|_| Error::ComposeOverflow)?;
        bytes
            .push(LINE_TERM_CHAR)
            .map_err(|_| Error::ComposeOverflow)?;

        Ok(Self {
            bytes,
            timeout: None,
            attempts: None,
        })
    }

    /// Override the per-attempt timeout configured on the client
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the number of attempts configured on the client
    #[must_use]
    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.attempts = Some(attempts.max(1));
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn attempts(&self) -> Option<u8> {
        self.attempts
    }
}

/// Raw bytes written without line framing, once a preceding control command
/// has switched the channel to data mode.
///
/// Like [`Command`], a payload may override the client's retry policy. A
/// payload the modem has already consumed must not be written a second time,
/// so most callers send it with a single attempt and a long timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload<'a> {
    bytes: &'a [u8],
    timeout: Option<Duration>,
    attempts: Option<u8>,
}

impl<'a> Payload<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            timeout: None,
            attempts: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.attempts = Some(attempts.max(1));
        self
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn attempts(&self) -> Option<u8> {
        self.attempts
    }
}
