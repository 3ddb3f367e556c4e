use embassy_time::{Duration, Instant};
use embedded_io::{Read, ReadReady, Write};

use super::{BlockingTimer, Dispatcher};
use crate::{
    buffer::{ResponseBuffer, RESPONSE_CAPACITY},
    helpers::LossyStr,
    CancelToken, Clock, Command, Config, Error, Payload, Response, SystemClock,
};

/// Client responsible for handling send, receive and timeout of AT commands
/// over a single serial transport.
///
/// The client busy-polls the transport for incoming bytes while waiting for
/// the expected token. Received bytes are accumulated in a receive buffer of
/// `N` bytes, which is cleared before every transmission. Bytes left on the
/// transport by an earlier exchange are discarded at the same time, so they
/// can never satisfy the token of a later one.
pub struct Client<T, C = SystemClock, const N: usize = RESPONSE_CAPACITY>
where
    T: Read + ReadReady + Write,
    C: Clock,
{
    transport: T,
    clock: C,
    buf: ResponseBuffer<N>,
    cooldown_timer: Option<BlockingTimer>,
    config: Config,
}

impl<T, C, const N: usize> Client<T, C, N>
where
    T: Read + ReadReady + Write,
    C: Clock,
{
    pub fn new(transport: T, clock: C, config: Config) -> Self {
        Self {
            transport,
            clock,
            buf: ResponseBuffer::new(),
            cooldown_timer: None,
            config,
        }
    }

    /// Release the transport and clock, discarding any buffered bytes
    pub fn release(self) -> (T, C) {
        (self.transport, self.clock)
    }

    fn send_inner(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() < 50 {
            debug!("Sending command: {:?}", LossyStr(bytes));
        } else {
            debug!("Sending command with long payload ({} bytes)", bytes.len());
        }

        self.transport
            .write_all(bytes)
            .map_err(|e| Error::from_io(&e, Error::Write))?;
        self.transport
            .flush()
            .map_err(|e| Error::from_io(&e, Error::Write))?;
        Ok(())
    }

    /// Run a complete exchange and return the attempt that matched.
    fn exchange(
        &mut self,
        bytes: &[u8],
        expected: &[u8],
        timeout: Duration,
        attempts: u8,
        cancel: &CancelToken,
    ) -> Result<u8, Error> {
        self.wait_cooldown_timer();

        let started = self.clock.now();
        let res = self.send_with_retry(bytes, expected, timeout, attempts, started, cancel);

        self.start_cooldown_timer();
        res
    }

    fn send_with_retry(
        &mut self,
        bytes: &[u8],
        expected: &[u8],
        timeout: Duration,
        attempts: u8,
        started: Instant,
        cancel: &CancelToken,
    ) -> Result<u8, Error> {
        for attempt in 1..=attempts {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if attempt > 1 {
                debug!("Attempt {}:", attempt);
            }

            self.buf.clear();
            self.discard_stale()?;
            self.send_inner(bytes)?;

            if self.wait_token(expected, timeout, started, cancel)? {
                return Ok(attempt);
            }

            if self.buf.is_truncated() {
                warn!(
                    "Response overran the {} byte receive buffer: {:?}",
                    N,
                    LossyStr(self.buf.as_slice())
                );
            }
            warn!(
                "No {:?} within {}ms (attempt {}/{})",
                LossyStr(expected),
                timeout.as_millis(),
                attempt,
                attempts
            );
        }

        Err(Error::Timeout)
    }

    /// Poll the transport until `expected` is in the receive buffer.
    ///
    /// Returns `Ok(false)` once `timeout` has passed since this call.
    fn wait_token(
        &mut self,
        expected: &[u8],
        timeout: Duration,
        started: Instant,
        cancel: &CancelToken,
    ) -> Result<bool, Error> {
        if self.buf.contains(expected) {
            return Ok(true);
        }

        let deadline = self.clock.now() + timeout;
        let total_deadline = self.config.total_timeout.map(|total| started + total);

        loop {
            if self.poll_byte()? && self.buf.contains(expected) {
                trace!("Received: {:?}", LossyStr(self.buf.as_slice()));
                return Ok(true);
            }

            if cancel.is_cancelled() {
                debug!("Exchange cancelled");
                return Err(Error::Cancelled);
            }

            let now = self.clock.now();
            if matches!(total_deadline, Some(total) if now >= total) {
                warn!("Exchange exceeded its total timeout");
                return Err(Error::Timeout);
            }
            if now >= deadline {
                return Ok(false);
            }
        }
    }

    /// Drop everything the transport has already received. Whatever arrived
    /// before a write belongs to an earlier command.
    fn discard_stale(&mut self) -> Result<(), Error> {
        let mut byte = [0; 1];
        let mut discarded = 0usize;

        while self
            .transport
            .read_ready()
            .map_err(|e| Error::from_io(&e, Error::Read))?
        {
            let n = self
                .transport
                .read(&mut byte)
                .map_err(|e| Error::from_io(&e, Error::Read))?;
            if n == 0 {
                break;
            }
            discarded += n;
        }

        if discarded > 0 {
            trace!("Discarded {} stale bytes", discarded);
        }
        Ok(())
    }

    /// Move at most one available byte into the receive buffer. Returns
    /// `true` if the buffer grew.
    fn poll_byte(&mut self) -> Result<bool, Error> {
        let ready = self
            .transport
            .read_ready()
            .map_err(|e| Error::from_io(&e, Error::Read))?;
        if !ready {
            return Ok(false);
        }

        let mut byte = [0; 1];
        let n = self
            .transport
            .read(&mut byte)
            .map_err(|e| Error::from_io(&e, Error::Read))?;

        Ok(n == 1 && self.buf.push(byte[0]))
    }

    fn start_cooldown_timer(&mut self) {
        self.cooldown_timer = Some(BlockingTimer::after(&self.clock, self.config.cmd_cooldown));
    }

    fn wait_cooldown_timer(&mut self) {
        if let Some(cooldown) = self.cooldown_timer.take() {
            cooldown.wait(&self.clock);
        }
    }

    fn response(&self, attempt: u8) -> Response<'_> {
        Response::new(self.buf.as_slice(), attempt)
    }
}

impl<T, C, const N: usize> Dispatcher for Client<T, C, N>
where
    T: Read + ReadReady + Write,
    C: Clock,
{
    type Clock = C;

    fn send_once(&mut self, cmd: &Command) -> Result<(), Error> {
        self.wait_cooldown_timer();
        let res = self.send_inner(cmd.as_bytes());
        self.start_cooldown_timer();
        res
    }

    fn send_and_await_with(
        &mut self,
        cmd: &Command,
        expected: &[u8],
        cancel: &CancelToken,
    ) -> Result<Response<'_>, Error> {
        let timeout = cmd.timeout().unwrap_or(self.config.timeout);
        let attempts = cmd.attempts().unwrap_or(self.config.attempts);

        let attempt = self.exchange(cmd.as_bytes(), expected, timeout, attempts, cancel)?;
        Ok(self.response(attempt))
    }

    fn send_data_and_await_with(
        &mut self,
        payload: &Payload<'_>,
        expected: &[u8],
        cancel: &CancelToken,
    ) -> Result<Response<'_>, Error> {
        let timeout = payload.timeout().unwrap_or(self.config.timeout);
        let attempts = payload.attempts().unwrap_or(self.config.attempts);

        let attempt = self.exchange(payload.as_bytes(), expected, timeout, attempts, cancel)?;
        Ok(self.response(attempt))
    }

    fn clock(&self) -> &C {
        &self.clock
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn set_config(&mut self, config: Config) {
        self.config = config;
    }
}
