//! General commands: identification and module setup.

use heapless::String;

use super::parse::{information, to_string};
use super::types::INFO_LEN;
use super::Modem;
use crate::blocking::Dispatcher;
use crate::board::BoardConfig;
use crate::{Command, Error};

pub const IMEI_LEN: usize = 15;

impl<D, B> Modem<D, B>
where
    D: Dispatcher,
    B: BoardConfig,
{
    /// Enable and power up the module, check that it answers and turn on
    /// command echo.
    pub fn init(&mut self) -> Result<(), Error> {
        self.enable()?;
        self.power_up()?;

        self.send_ok("AT")?;
        self.send_ok("ATE1")
    }

    /// Store the current parameters in the user profile
    pub fn save_configurations(&mut self) -> Result<(), Error> {
        self.send_ok("AT&W")
    }

    pub fn imei(&mut self) -> Result<String<IMEI_LEN>, Error> {
        let imei: String<IMEI_LEN> = self.query_info("AT+CGSN")?;
        if imei.len() != IMEI_LEN || !imei.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Parse);
        }
        Ok(imei)
    }

    /// Firmware revision, `AT+CGMR`
    pub fn firmware_info(&mut self) -> Result<String<INFO_LEN>, Error> {
        self.query_info("AT+CGMR")
    }

    /// Model identification, `AT+CGMM`
    pub fn hardware_info(&mut self) -> Result<String<INFO_LEN>, Error> {
        self.query_info("AT+CGMM")
    }

    /// Send `cmd` and copy out the single line of information text in its
    /// response.
    pub(crate) fn query_info<const N: usize>(&mut self, cmd: &str) -> Result<String<N>, Error> {
        let response = self.dispatcher.send_and_await(&Command::new(cmd)?, b"OK")?;
        information(response.as_bytes())
            .ok_or(Error::Parse)
            .and_then(to_string)
    }
}
