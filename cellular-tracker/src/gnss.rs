//! NMEA output and fix indicator of the GNSS receiver.
//!
//! The receiver streams sentences on its own serial link, independent of the
//! modem's command channel. Sentences are handed out as raw text; decoding
//! them is left to the caller.

use embassy_time::Duration;
use embedded_hal::digital::InputPin;
use embedded_io::{Read, ReadReady};
use heapless::String;

use crate::blocking::BlockingTimer;
use crate::helpers::LossyStr;
use crate::{Clock, Error, SystemClock};

/// Longest sentence kept by [`Gnss::read_sentence`], well above the 82
/// characters allowed by NMEA 0183.
pub const NMEA_SENTENCE_LEN: usize = 128;

pub struct Gnss<R, P, C = SystemClock>
where
    R: Read + ReadReady,
    P: InputPin,
    C: Clock,
{
    serial: R,
    fix_pin: P,
    clock: C,
}

impl<R, P, C> Gnss<R, P, C>
where
    R: Read + ReadReady,
    P: InputPin,
    C: Clock,
{
    pub fn new(serial: R, fix_pin: P, clock: C) -> Self {
        Self {
            serial,
            fix_pin,
            clock,
        }
    }

    pub fn release(self) -> (R, P, C) {
        (self.serial, self.fix_pin, self.clock)
    }

    /// Next raw byte from the receiver, if one is available
    pub fn read_char(&mut self) -> Result<Option<u8>, Error> {
        let ready = self
            .serial
            .read_ready()
            .map_err(|e| Error::from_io(&e, Error::Read))?;
        if !ready {
            return Ok(None);
        }

        let mut byte = [0; 1];
        let n = self
            .serial
            .read(&mut byte)
            .map_err(|e| Error::from_io(&e, Error::Read))?;
        Ok((n == 1).then_some(byte[0]))
    }

    /// Wait for the next complete sentence, starting at `$` and ending at the
    /// line break, which is stripped.
    ///
    /// Bytes received before the first `$` belong to a sentence that was
    /// already under way and are discarded. Characters past
    /// [`NMEA_SENTENCE_LEN`] are dropped.
    pub fn read_sentence(&mut self, timeout: Duration) -> Result<String<NMEA_SENTENCE_LEN>, Error> {
        let timer = BlockingTimer::after(&self.clock, timeout);
        let mut sentence: String<NMEA_SENTENCE_LEN> = String::new();
        let mut started = false;
        let mut truncated = false;

        loop {
            match self.read_char()? {
                Some(b'$') if !started => {
                    started = true;
                    // Cannot fail on an empty string
                    let _ = sentence.push('$');
                }
                Some(b'\r') | None => {}
                Some(b'\n') if started => {
                    if truncated {
                        warn!(
                            "Sentence exceeded {} characters: {:?}",
                            NMEA_SENTENCE_LEN,
                            LossyStr(sentence.as_bytes())
                        );
                    }
                    trace!("NMEA: {:?}", LossyStr(sentence.as_bytes()));
                    return Ok(sentence);
                }
                Some(c) if started => {
                    if !c.is_ascii() {
                        return Err(Error::Parse);
                    }
                    truncated |= sentence.push(char::from(c)).is_err();
                }
                Some(_) => {}
            }

            if timer.is_expired(&self.clock) {
                return Err(Error::Timeout);
            }
        }
    }

    /// Whether the receiver signals a 3D position fix on its indicator line
    pub fn is_3d_fixed(&mut self) -> Result<bool, Error> {
        self.fix_pin.is_high().map_err(|_| Error::Pin)
    }
}
