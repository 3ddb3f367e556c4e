//! SIM card commands.

use heapless::String;

use super::parse::{self, parse};
use super::types::{SimStatus, INFO_LEN};
use super::Modem;
use crate::blocking::Dispatcher;
use crate::board::BoardConfig;
use crate::{Command, Error};

impl<D, B> Modem<D, B>
where
    D: Dispatcher,
    B: BoardConfig,
{
    /// Integrated circuit card identifier of the SIM, `AT+QCCID`
    pub fn iccid(&mut self) -> Result<String<INFO_LEN>, Error> {
        let iccid: String<INFO_LEN> = self.query_info("AT+QCCID")?;
        match iccid.strip_prefix("+QCCID:") {
            Some(rest) => String::try_from(rest.trim()).map_err(|_| Error::Parse),
            None => Ok(iccid),
        }
    }

    pub fn sim_status(&mut self) -> Result<SimStatus, Error> {
        let response = self
            .dispatcher
            .send_and_await(&Command::new("AT+CPIN?")?, b"OK")?;
        let code = response.line_with_prefix(b"+CPIN:").ok_or(Error::Parse)?;
        parse(parse::sim_status, code)
    }

    /// Unlock the SIM with its PIN code
    pub fn enter_pin(&mut self, pin: &str) -> Result<(), Error> {
        let cmd = Command::compose(format_args!("AT+CPIN={}", pin))?;
        self.dispatcher.send_and_await(&cmd, b"OK")?;
        Ok(())
    }
}
