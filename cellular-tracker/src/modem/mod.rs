//! Modem operations of the tracker board, built on a [`Dispatcher`].
//!
//! Every operation composes its command, picks the token that marks success
//! and post-processes the raw response. The operations are grouped the same
//! way as the AT command manual: [`general`], [`sim`], [`network`], [`sms`]
//! and [`ip`].
//!
//! Responses must fit the dispatcher's receive buffer. The default
//! [`RESPONSE_CAPACITY`](crate::RESPONSE_CAPACITY) covers every command
//! except reading stored messages; see [`Modem::read_sms`].

pub mod general;
pub mod ip;
pub mod network;
mod parse;
pub mod sim;
pub mod sms;
pub mod types;

use embassy_time::Duration;
use embedded_hal::digital::PinState;

use crate::blocking::{BlockingTimer, Dispatcher};
use crate::board::{drive, is_active, BoardConfig};
use crate::module_timing::{boot_time, pwr_on_time, reset_time};
use crate::{Command, Endpoint, Error};
use types::{ConnectionState, PowerState};

pub struct Modem<D, B>
where
    D: Dispatcher,
    B: BoardConfig,
{
    pub(crate) dispatcher: D,
    board: B,
    endpoint: Endpoint,
    state: ConnectionState,
}

impl<D, B> Modem<D, B>
where
    D: Dispatcher,
    B: BoardConfig,
{
    pub fn new(dispatcher: D, board: B) -> Self {
        Self {
            dispatcher,
            board,
            endpoint: Endpoint::new(),
            state: ConnectionState::Disabled,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut Endpoint {
        &mut self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Per-attempt response timeout, in milliseconds
    pub fn timeout(&self) -> u16 {
        u16::try_from(self.dispatcher.config().get_timeout().as_millis()).unwrap_or(u16::MAX)
    }

    pub fn set_timeout(&mut self, ms: u16) {
        let config = self.dispatcher.config().timeout_ms(ms);
        self.dispatcher.set_config(config);
    }

    pub fn dispatcher(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    pub fn release(self) -> (D, B) {
        (self.dispatcher, self.board)
    }

    pub(crate) fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            debug!("Connection state: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Send a control command and wait for the final `OK`
    pub(crate) fn send_ok(&mut self, cmd: &str) -> Result<(), Error> {
        self.dispatcher
            .send_and_await(&Command::new(cmd)?, b"OK")
            .map(|_| ())
    }

    fn delay(&self, duration: Duration) {
        let clock = self.dispatcher.clock();
        BlockingTimer::after(clock, duration).wait(clock);
    }

    /// Switch on the regulator feeding the modem and the peripherals
    pub fn enable(&mut self) -> Result<(), Error> {
        drive(self.board.enable_pin(), PinState::High)?;
        if self.state == ConnectionState::Disabled {
            self.set_state(ConnectionState::Enabled);
        }
        Ok(())
    }

    /// Switch off the regulator feeding the modem and the peripherals
    pub fn disable(&mut self) -> Result<(), Error> {
        drive(self.board.enable_pin(), PinState::Low)?;
        self.set_state(ConnectionState::Disabled);
        Ok(())
    }

    /// Whether the module is running, from the status line if the board has
    /// one, otherwise by probing it with `AT`.
    pub fn modem_status(&mut self) -> Result<PowerState, Error> {
        let on = match self.board.status_pin() {
            Some(pin) => is_active(pin, B::STATUS_ON_LEVEL)?,
            None => {
                let probe = Command::new("AT")?.with_attempts(1);
                match self.dispatcher.send_and_await(&probe, b"OK") {
                    Ok(_) => true,
                    Err(Error::Timeout) => false,
                    Err(e) => return Err(e),
                }
            }
        };

        Ok(if on { PowerState::On } else { PowerState::Off })
    }

    /// Pulse the power key, unless the module is already running, and wait
    /// for it to come up.
    pub fn power_up(&mut self) -> Result<(), Error> {
        if self.modem_status()? == PowerState::On {
            debug!("Modem already powered up");
            return Ok(());
        }

        if self.board.power_key_pin().is_none() {
            error!("Modem is powered down and there is no power key to wake it");
            return Err(Error::PoweredDown);
        }

        info!("Powering up modem");
        drive(self.board.power_key_pin(), PinState::High)?;
        self.delay(pwr_on_time());
        drive(self.board.power_key_pin(), PinState::Low)?;

        let timer = BlockingTimer::after(self.dispatcher.clock(), boot_time());
        loop {
            if self.modem_status()? == PowerState::On {
                info!("Modem powered up");
                return Ok(());
            }
            if timer.is_expired(self.dispatcher.clock()) {
                error!("Modem did not power up");
                return Err(Error::PoweredDown);
            }
        }
    }

    /// Power cycle the board, keeping the settings stored with `AT&W`.
    pub fn reset_module(&mut self) -> Result<(), Error> {
        self.save_configurations()?;
        self.disable()?;
        self.delay(reset_time());
        self.enable()?;
        self.power_up()
    }

    /// Whether the user button is pressed
    pub fn read_user_button(&mut self) -> Result<bool, Error> {
        match self.board.button_pin() {
            Some(pin) => is_active(pin, B::BUTTON_PRESSED_LEVEL),
            None => Ok(false),
        }
    }

    pub fn turn_on_user_led(&mut self) -> Result<(), Error> {
        drive(self.board.led_pin(), PinState::High)
    }

    pub fn turn_off_user_led(&mut self) -> Result<(), Error> {
        drive(self.board.led_pin(), PinState::Low)
    }
}


#[cfg(test)]
mod test {
    use super::test_helpers::setup;
    use super::*;
    use crate::blocking::Client;
    use crate::board::test_board::{BareBoard, Line};
    use crate::tx_mock::{MockClock, MockTransport};
    use crate::Config;

    #[test]
    fn enable_and_disable() {
        let (mut modem, _, lines) = setup();
        assert_eq!(modem.state(), ConnectionState::Disabled);

        modem.enable().unwrap();
        assert_eq!(modem.state(), ConnectionState::Enabled);

        modem.disable().unwrap();
        assert_eq!(modem.state(), ConnectionState::Disabled);
        assert_eq!(
            lines.borrow().history,
            [(Line::Enable, true), (Line::Enable, false)]
        );
    }

    #[test]
    fn power_up_pulses_key() {
        let (mut modem, transport, lines) = setup();
        {
            let mut lines = lines.borrow_mut();
            lines.status = true;
            lines.status_after_pulse = Some(false);
        }
        assert_eq!(modem.modem_status(), Ok(PowerState::Off));

        modem.power_up().unwrap();
        assert_eq!(modem.modem_status(), Ok(PowerState::On));
        assert_eq!(
            lines.borrow().history,
            [(Line::PowerKey, true), (Line::PowerKey, false)]
        );
        assert!(transport.writes().is_empty());
    }

    #[test]
    fn power_up_skipped_when_running() {
        let (mut modem, _, lines) = setup();
        modem.power_up().unwrap();
        assert!(lines.borrow().history.is_empty());
    }

    #[test]
    fn power_up_gives_up() {
        let (mut modem, _, lines) = setup();
        lines.borrow_mut().status = true;

        assert_eq!(modem.power_up(), Err(Error::PoweredDown));
    }

    #[test]
    fn status_probed_without_status_line() {
        let clock = MockClock::new();
        let transport = MockTransport::new(&clock);
        let client: Client<MockTransport, MockClock> =
            Client::new(transport.clone(), clock, Config::new().timeout_ms(50));
        let mut modem = Modem::new(client, BareBoard);

        transport.reply(b"AT\r\r\nOK\r\n");
        assert_eq!(modem.modem_status(), Ok(PowerState::On));

        transport.silence();
        assert_eq!(modem.modem_status(), Ok(PowerState::Off));
        assert_eq!(transport.writes(), ["AT\r", "AT\r"]);

        assert_eq!(modem.power_up(), Err(Error::PoweredDown));
        assert_eq!(modem.read_user_button(), Ok(false));
        modem.turn_on_user_led().unwrap();
    }

    #[test]
    fn button_and_led() {
        let (mut modem, _, lines) = setup();

        lines.borrow_mut().button = true;
        assert_eq!(modem.read_user_button(), Ok(false));
        lines.borrow_mut().button = false;
        assert_eq!(modem.read_user_button(), Ok(true));

        modem.turn_on_user_led().unwrap();
        modem.turn_off_user_led().unwrap();
        assert_eq!(
            lines.borrow().history,
            [(Line::Led, true), (Line::Led, false)]
        );
    }

    #[test]
    fn timeout_setting() {
        let (mut modem, _, _) = setup();
        assert_eq!(modem.timeout(), 100);
        modem.set_timeout(2500);
        assert_eq!(modem.timeout(), 2500);
    }

    #[test]
    fn reset_power_cycles() {
        let (mut modem, transport, lines) = setup();
        transport.reply(b"AT&W\r\r\nOK\r\n");

        modem.reset_module().unwrap();

        assert_eq!(transport.writes(), ["AT&W\r"]);
        assert_eq!(
            lines.borrow().history,
            [(Line::Enable, false), (Line::Enable, true)]
        );
        assert_eq!(modem.state(), ConnectionState::Enabled);
    }
}
