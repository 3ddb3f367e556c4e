//! # cellular-tracker
//!
//! Driver for tracker boards pairing a Quectel M95 GSM/GPRS modem with a
//! Quectel L96 GNSS receiver, each attached through its own serial link.
//!
//! The heart of the crate is a blocking AT command dispatcher,
//! [`blocking::Client`]. It writes one command at a time to a serial
//! transport, accumulates the reply into a bounded receive buffer and returns
//! as soon as an expected token shows up anywhere in the received bytes. If
//! the token does not arrive within the per-attempt timeout, the command is
//! sent again, up to a bounded number of attempts.
//!
//! [`Modem`] builds the modem operations (SIM, network registration, SMS,
//! packet data context and TCP/UDP sessions) on top of any
//! [`Dispatcher`](blocking::Dispatcher), and drives the board's power key,
//! enable line, button and LED through [`BoardConfig`](board::BoardConfig). [`Gnss`] reads NMEA
//! sentences and the 3D fix indicator of the positioning receiver.
//!
//! ## Example
//!
//! ```ignore
//! use cellular_tracker::prelude::*;
//!
//! let client = Client::new(serial, SystemClock, Config::new());
//! let mut modem = Modem::new(client, board);
//!
//! modem.endpoint_mut().set_apn("internet")?;
//! modem.endpoint_mut().set_domain_name("tracker.example.com")?;
//! modem.endpoint_mut().set_port("5000")?;
//!
//! modem.init()?;
//! modem.attach()?;
//! modem.connect_tcp()?;
//! modem.send_tcp(b"hello")?;
//! modem.close_connection()?;
//! ```
//!
//! ## Optional Cargo Features
//!
//! - **`log`**: Enable log statements on various log levels to aid
//!   debugging. Powered by `log`.
//! - **`defmt`**: Enable defmt log statements on various log levels to aid
//!   debugging. Powered by `defmt`.
//! - **`std`**: Enable std support for `nom`, `embassy-time` and
//!   `embedded-io`.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod blocking;
pub mod board;
mod buffer;
mod cancel;
mod clock;
mod command;
mod config;
mod error;
pub mod gnss;
mod helpers;
pub mod modem;
pub mod module_timing;
mod response;

#[cfg(test)]
mod tx_mock;

pub use buffer::{ResponseBuffer, RESPONSE_CAPACITY};
pub use cancel::CancelToken;
pub use clock::{Clock, SystemClock};
pub use command::{Command, Payload, COMMAND_CAPACITY, CTRL_Z, LINE_TERM_CHAR};
pub use config::{
    Config, Endpoint, APN_LEN, DEFAULT_ATTEMPTS, DEFAULT_TIMEOUT_MS, DOMAIN_NAME_LEN,
    IP_ADDRESS_LEN, PORT_NUMBER_LEN,
};
pub use error::Error;
pub use gnss::Gnss;
pub use modem::Modem;
pub use response::Response;

pub mod prelude {
    //! The prelude is a collection of all the traits and types in this crate
    //! needed to set up a modem and talk to it.

    pub use crate::blocking::{Client, Dispatcher};
    pub use crate::board::{BoardConfig, NoPin};
    pub use crate::gnss::Gnss;
    pub use crate::modem::Modem;
    pub use crate::{
        CancelToken, Clock, Command, Config, Endpoint, Error, Payload, SystemClock,
    };
}
