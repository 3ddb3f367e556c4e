mod blocking_timer;
mod client;

pub use blocking_timer::BlockingTimer;
pub use client::Client;

use crate::{CancelToken, Clock, Command, Config, Error, Payload, Response};

/// Strictly serialized command/response exchange with a modem.
///
/// Every call takes `&mut self`, so only one command can be in flight on a
/// given dispatcher. Share a dispatcher between tasks by wrapping it in a
/// mutex.
pub trait Dispatcher {
    type Clock: Clock;

    /// Write a command without collecting any response.
    fn send_once(&mut self, cmd: &Command) -> Result<(), Error>;

    /// Send a control command and wait until `expected` appears anywhere in
    /// the received bytes.
    ///
    /// If the token does not show up within the per-attempt timeout, the
    /// receive buffer is cleared and the command is written again, up to the
    /// configured number of attempts. Exhausting the attempts yields
    /// [`Error::Timeout`].
    fn send_and_await(&mut self, cmd: &Command, expected: &[u8]) -> Result<Response<'_>, Error> {
        self.send_and_await_with(cmd, expected, &CancelToken::new())
    }

    /// Like [`send_and_await`](Self::send_and_await), but aborts with
    /// [`Error::Cancelled`] as soon as `cancel` is set.
    fn send_and_await_with(
        &mut self,
        cmd: &Command,
        expected: &[u8],
        cancel: &CancelToken,
    ) -> Result<Response<'_>, Error>;

    /// Send a raw payload, without control line framing, and wait for
    /// `expected`. Used once the channel has been switched to data mode by a
    /// preceding control command. Retried under the same policy as control
    /// commands, unless the payload overrides it.
    fn send_data_and_await(
        &mut self,
        payload: &Payload<'_>,
        expected: &[u8],
    ) -> Result<Response<'_>, Error> {
        self.send_data_and_await_with(payload, expected, &CancelToken::new())
    }

    fn send_data_and_await_with(
        &mut self,
        payload: &Payload<'_>,
        expected: &[u8],
        cancel: &CancelToken,
    ) -> Result<Response<'_>, Error>;

    /// Time source used for deadlines. Also used by callers that need to
    /// pace peripheral signals.
    fn clock(&self) -> &Self::Clock;

    fn config(&self) -> &Config;

    /// Replace the retry policy used by subsequent exchanges
    fn set_config(&mut self, config: Config);
}
