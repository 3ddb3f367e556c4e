use embassy_time::Duration;
use heapless::String;

use crate::Error;

pub const DEFAULT_TIMEOUT_MS: u16 = 1000;
pub const DEFAULT_ATTEMPTS: u8 = 3;

pub const IP_ADDRESS_LEN: usize = 30;
pub const DOMAIN_NAME_LEN: usize = 50;
pub const PORT_NUMBER_LEN: usize = 8;
pub const APN_LEN: usize = 32;

/// Configuration of the command dispatcher.
///
/// The same retry policy applies to control commands and to raw data
/// payloads. Individual [`Command`](crate::Command)s may override the
/// per-attempt timeout and the number of attempts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub(crate) timeout: Duration,
    pub(crate) attempts: u8,
    pub(crate) total_timeout: Option<Duration>,
    pub(crate) cmd_cooldown: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS as u64),
            attempts: DEFAULT_ATTEMPTS,
            total_timeout: None,
            cmd_cooldown: Duration::from_millis(20),
        }
    }

    /// Time to wait for the expected token after each transmission, before
    /// the command is sent again.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn timeout_ms(self, ms: u16) -> Self {
        self.timeout(Duration::from_millis(ms as u64))
    }

    /// Maximum number of transmissions per exchange. Clamped to at least one.
    #[must_use]
    pub const fn attempts(mut self, attempts: u8) -> Self {
        self.attempts = if attempts == 0 { 1 } else { attempts };
        self
    }

    /// Upper bound on the time spent in a single exchange across all attempts.
    #[must_use]
    pub const fn total_timeout(mut self, timeout: Duration) -> Self {
        self.total_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn cmd_cooldown(mut self, cooldown: Duration) -> Self {
        self.cmd_cooldown = cooldown;
        self
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_attempts(&self) -> u8 {
        self.attempts
    }
}

/// Remote endpoint and packet data settings used when composing socket
/// commands.
///
/// Every field is bounded. Setters fail with [`Error::ComposeOverflow`] and
/// leave the previous value untouched when the input does not fit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    ip_address: String<IP_ADDRESS_LEN>,
    domain_name: String<DOMAIN_NAME_LEN>,
    port: String<PORT_NUMBER_LEN>,
    apn: String<APN_LEN>,
}

impl Endpoint {
    pub const fn new() -> Self {
        Self {
            ip_address: String::new(),
            domain_name: String::new(),
            port: String::new(),
            apn: String::new(),
        }
    }

    pub fn set_ip_address(&mut self, ip: &str) -> Result<(), Error> {
        self.ip_address = bounded(ip)?;
        Ok(())
    }

    pub fn set_domain_name(&mut self, domain: &str) -> Result<(), Error> {
        self.domain_name = bounded(domain)?;
        Ok(())
    }

    pub fn set_port(&mut self, port: &str) -> Result<(), Error> {
        self.port = bounded(port)?;
        Ok(())
    }

    pub fn set_apn(&mut self, apn: &str) -> Result<(), Error> {
        self.apn = bounded(apn)?;
        Ok(())
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn apn(&self) -> &str {
        &self.apn
    }

    /// Host to connect to, preferring the IP address over the domain name.
    ///
    /// The flag is `true` when the host is a domain name that the modem
    /// must resolve.
    pub fn host(&self) -> Result<(&str, bool), Error> {
        if !self.ip_address.is_empty() {
            Ok((&self.ip_address, false))
        } else if !self.domain_name.is_empty() {
            Ok((&self.domain_name, true))
        } else {
            Err(Error::MissingEndpoint)
        }
    }
}

fn bounded<const N: usize>(s: &str) -> Result<String<N>, Error> {
    String::try_from(s).map_err(|_| Error::ComposeOverflow)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.get_timeout(), Duration::from_millis(1000));
        assert_eq!(config.get_attempts(), 3);
        assert_eq!(config.total_timeout, None);

        assert_eq!(Config::new().attempts(0).get_attempts(), 1);
        assert_eq!(
            Config::new().timeout_ms(250).get_timeout(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn endpoint_bounds() {
        let mut endpoint = Endpoint::new();
        assert_eq!(endpoint.host(), Err(Error::MissingEndpoint));

        endpoint.set_domain_name("example.com").unwrap();
        assert_eq!(endpoint.host(), Ok(("example.com", true)));

        endpoint.set_ip_address("93.184.216.34").unwrap();
        assert_eq!(endpoint.host(), Ok(("93.184.216.34", false)));

        let too_long = "a".repeat(DOMAIN_NAME_LEN + 1);
        assert_eq!(
            endpoint.set_domain_name(&too_long),
            Err(Error::ComposeOverflow)
        );
        assert_eq!(endpoint.domain_name(), "example.com");

        endpoint.set_domain_name(&"a".repeat(DOMAIN_NAME_LEN)).unwrap();
        assert_eq!(endpoint.domain_name().len(), DOMAIN_NAME_LEN);

        assert_eq!(endpoint.set_port("123456789"), Err(Error::ComposeOverflow));
        endpoint.set_port("8080").unwrap();
        assert_eq!(endpoint.port(), "8080");
    }
}
