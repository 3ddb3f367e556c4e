//! Short message service, in text mode.

use heapless::Vec;

use super::parse::{self, parse, to_string};
use super::types::{SmsMessage, SMS_TEXT_LEN};
use super::Modem;
use crate::blocking::Dispatcher;
use crate::board::BoardConfig;
use crate::helpers::SliceExt;
use crate::module_timing::sms_send_timeout;
use crate::{Command, Error, Payload, CTRL_Z};

impl<D, B> Modem<D, B>
where
    D: Dispatcher,
    B: BoardConfig,
{
    /// Send `text` to `number`.
    ///
    /// The body is written once the modem prompts for it and is not sent
    /// again if the confirmation does not arrive in time.
    pub fn send_sms(&mut self, number: &str, text: &str) -> Result<(), Error> {
        let mut body: Vec<u8, { SMS_TEXT_LEN + 1 }> = Vec::new();
        body.extend_from_slice(text.as_bytes())
            .map_err(|_| Error::ComposeOverflow)?;
        body.push(CTRL_Z).map_err(|_| Error::ComposeOverflow)?;
        let cmd = Command::compose(format_args!("AT+CMGS=\"{}\"", number))?;

        self.send_ok("AT+CMGF=1")?;
        self.dispatcher.send_and_await(&cmd, b">")?;

        let payload = Payload::new(&body)
            .with_timeout(sms_send_timeout())
            .with_attempts(1);
        self.dispatcher.send_data_and_await(&payload, b"+CMGS")?;
        Ok(())
    }

    /// Read the message stored at `index`.
    ///
    /// The echo and the `+CMGR` header alone take about 80 bytes, so with the
    /// default receive buffer of [`RESPONSE_CAPACITY`](crate::RESPONSE_CAPACITY)
    /// bytes only very short texts fit. Give the client a larger buffer when
    /// messages are read:
    ///
    /// ```ignore
    /// let client: Client<_, _, 256> = Client::new(serial, SystemClock, Config::new());
    /// let mut modem = Modem::new(client, board);
    /// let sms = modem.read_sms(1)?;
    /// ```
    pub fn read_sms(&mut self, index: u8) -> Result<SmsMessage, Error> {
        let cmd = Command::compose(format_args!("AT+CMGR={}", index))?;
        let response = self.dispatcher.send_and_await(&cmd, b"OK")?;

        let mut lines = response.lines();
        let header = lines
            .by_ref()
            .find_map(|line| line.strip_prefix(b"+CMGR:"))
            .ok_or(Error::Parse)?;
        let (status, sender) = parse(parse::sms_header, header.trim(&[b' ']))?;
        let text = lines.next().filter(|line| *line != b"OK").unwrap_or(&[]);

        Ok(SmsMessage {
            status: to_string(status)?,
            sender: to_string(sender)?,
            text: to_string(text)?,
        })
    }

    pub fn delete_all_sms(&mut self) -> Result<(), Error> {
        self.send_ok("AT+QMGDA=\"DEL ALL\"")
    }
}
