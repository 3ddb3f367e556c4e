//! Network service commands.

use heapless::String;

use super::parse::{self, parse, to_string};
use super::types::{ConnectionState, RegistrationStatus, SignalQuality, OPERATOR_LEN};
use super::Modem;
use crate::blocking::{BlockingTimer, Dispatcher};
use crate::board::BoardConfig;
use crate::module_timing::{registration_poll_interval, REGISTRATION_POLLS};
use crate::{Command, Error};

impl<D, B> Modem<D, B>
where
    D: Dispatcher,
    B: BoardConfig,
{
    pub fn signal_quality(&mut self) -> Result<SignalQuality, Error> {
        let response = self
            .dispatcher
            .send_and_await(&Command::new("AT+CSQ")?, b"OK")?;
        let params = response.line_with_prefix(b"+CSQ:").ok_or(Error::Parse)?;
        parse(parse::signal_quality, params)
    }

    /// Network registration status, `AT+CREG?`
    pub fn registration_status(&mut self) -> Result<RegistrationStatus, Error> {
        let response = self
            .dispatcher
            .send_and_await(&Command::new("AT+CREG?")?, b"OK")?;
        let params = response.line_with_prefix(b"+CREG:").ok_or(Error::Parse)?;
        parse(parse::registration, params)
    }

    /// Wait until the module is registered on its home network or roaming.
    ///
    /// The registration status is polled a bounded number of times before
    /// giving up with [`Error::Timeout`].
    pub fn connect_to_operator(&mut self) -> Result<(), Error> {
        for poll in 1..=REGISTRATION_POLLS {
            let status = self.registration_status()?;
            if status.is_registered() {
                info!("Registered on network ({:?})", status);
                self.set_state(ConnectionState::Registered);
                return Ok(());
            }

            debug!("Not registered yet: {:?} ({}/{})", status, poll, REGISTRATION_POLLS);
            let clock = self.dispatcher.clock();
            BlockingTimer::after(clock, registration_poll_interval()).wait(clock);
        }

        warn!("Network registration did not complete");
        Err(Error::Timeout)
    }

    /// Name of the operator the module is registered with, `AT+COPS?`
    pub fn check_operator(&mut self) -> Result<Option<String<OPERATOR_LEN>>, Error> {
        let response = self
            .dispatcher
            .send_and_await(&Command::new("AT+COPS?")?, b"OK")?;
        let params = response.line_with_prefix(b"+COPS:").ok_or(Error::Parse)?;
        parse(parse::operator, params)?
            .map(to_string::<OPERATOR_LEN>)
            .transpose()
    }
}
