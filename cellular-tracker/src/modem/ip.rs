//! Packet data context and TCP/UDP sessions.
//!
//! Sessions use buffer access mode: every payload is announced with
//! `AT+QISEND=<len>` and written as raw bytes once the modem prompts for it.

use super::types::{ConnectionState, Protocol};
use super::Modem;
use crate::blocking::Dispatcher;
use crate::board::BoardConfig;
use crate::module_timing::{
    connect_timeout, context_activation_timeout, context_deactivation_timeout,
    send_confirmation_timeout,
};
use crate::{Command, Error, Payload};

impl<D, B> Modem<D, B>
where
    D: Dispatcher,
    B: BoardConfig,
{
    /// Configure the foreground context with the stored APN and activate it.
    pub fn activate_context(&mut self) -> Result<(), Error> {
        let apn = Command::compose(format_args!("AT+QICSGP=1,\"{}\"", self.endpoint().apn()))?;

        self.send_ok("AT+QIFGCNT=0")?;
        self.dispatcher.send_and_await(&apn, b"OK")?;
        self.send_ok("AT+QIREGAPP")?;

        let activate = Command::new("AT+QIACT")?.with_timeout(context_activation_timeout());
        self.dispatcher.send_and_await(&activate, b"OK")?;

        self.set_state(ConnectionState::ContextActive);
        Ok(())
    }

    pub fn deactivate_context(&mut self) -> Result<(), Error> {
        let cmd = Command::new("AT+QIDEACT")?.with_timeout(context_deactivation_timeout());
        self.dispatcher.send_and_await(&cmd, b"DEACT OK")?;

        self.set_state(ConnectionState::Registered);
        Ok(())
    }

    /// Open a TCP connection to the stored endpoint
    pub fn connect_tcp(&mut self) -> Result<(), Error> {
        self.open(Protocol::Tcp)
    }

    /// Open a UDP session with the stored endpoint
    pub fn start_udp(&mut self) -> Result<(), Error> {
        self.open(Protocol::Udp)
    }

    fn open(&mut self, protocol: Protocol) -> Result<(), Error> {
        let (host, is_domain) = self.endpoint().host()?;
        let port = self.endpoint().port();
        if port.is_empty() {
            return Err(Error::MissingEndpoint);
        }

        let addressing = Command::compose(format_args!("AT+QIDNSIP={}", u8::from(is_domain)))?;
        let open = Command::compose(format_args!(
            "AT+QIOPEN=\"{}\",\"{}\",\"{}\"",
            protocol.as_str(),
            host,
            port
        ))?
        .with_timeout(connect_timeout());

        self.dispatcher.send_and_await(&addressing, b"OK")?;
        self.dispatcher.send_and_await(&open, b"CONNECT OK")?;

        info!("{} session open", protocol.as_str());
        self.set_state(ConnectionState::SessionOpen);
        Ok(())
    }

    pub fn send_tcp(&mut self, data: &[u8]) -> Result<(), Error> {
        self.send(data)
    }

    pub fn send_udp(&mut self, data: &[u8]) -> Result<(), Error> {
        self.send(data)
    }

    /// Write `data` once the modem prompts for it. The modem consumes
    /// exactly the announced length, so the payload is never written twice.
    fn send(&mut self, data: &[u8]) -> Result<(), Error> {
        let cmd = Command::compose(format_args!("AT+QISEND={}", data.len()))?;
        let payload = Payload::new(data)
            .with_timeout(send_confirmation_timeout())
            .with_attempts(1);

        self.dispatcher.send_and_await(&cmd, b">")?;
        self.dispatcher.send_data_and_await(&payload, b"SEND OK")?;
        Ok(())
    }

    pub fn close_connection(&mut self) -> Result<(), Error> {
        self.dispatcher
            .send_and_await(&Command::new("AT+QICLOSE")?, b"CLOSE OK")?;

        self.set_state(ConnectionState::SessionClosed);
        Ok(())
    }

    /// Bring the modem from power off to an active packet data context:
    /// power up, wait for network registration and activate the context.
    pub fn attach(&mut self) -> Result<(), Error> {
        self.power_up()?;
        self.connect_to_operator()?;
        self.activate_context()
    }
}
