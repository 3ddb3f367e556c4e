use heapless::String;

/// Connection lifecycle of the modem, advanced by the [`Modem`](super::Modem)
/// operations that issue the corresponding commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    #[default]
    Disabled,
    Enabled,
    Registered,
    ContextActive,
    SessionOpen,
    SessionClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    On,
    Off,
}

/// `+CPIN` status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimStatus {
    Ready,
    PinRequired,
    PukRequired,
    Pin2Required,
    Puk2Required,
    PhoneToSimPinRequired,
    NotInserted,
}

/// `<stat>` of `+CREG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStatus {
    NotRegistered,
    Home,
    Searching,
    Denied,
    Unknown,
    Roaming,
}

impl RegistrationStatus {
    pub(crate) fn from_stat(stat: u8) -> Self {
        match stat {
            0 => Self::NotRegistered,
            1 => Self::Home,
            2 => Self::Searching,
            3 => Self::Denied,
            5 => Self::Roaming,
            _ => Self::Unknown,
        }
    }

    pub fn is_registered(self) -> bool {
        matches!(self, Self::Home | Self::Roaming)
    }
}

/// `+CSQ` report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalQuality {
    /// 0..=31, or 99 when not detectable
    pub rssi: u8,
    /// 0..=7, or 99 when not detectable
    pub ber: u8,
}

impl SignalQuality {
    /// Received signal strength in dBm
    pub fn dbm(&self) -> Option<i16> {
        match self.rssi {
            0..=31 => Some(-113 + 2 * i16::from(self.rssi)),
            _ => None,
        }
    }
}

pub const OPERATOR_LEN: usize = 24;
pub const PHONE_NUMBER_LEN: usize = 24;
pub const SMS_STATUS_LEN: usize = 12;
pub const SMS_TEXT_LEN: usize = 160;
pub const INFO_LEN: usize = 32;

/// Text message read with `AT+CMGR`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    /// e.g. `REC UNREAD`
    pub status: String<SMS_STATUS_LEN>,
    pub sender: String<PHONE_NUMBER_LEN>,
    pub text: String<SMS_TEXT_LEN>,
}

/// Transport protocol of a socket session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signal_strength() {
        assert_eq!(SignalQuality { rssi: 0, ber: 0 }.dbm(), Some(-113));
        assert_eq!(SignalQuality { rssi: 17, ber: 0 }.dbm(), Some(-79));
        assert_eq!(SignalQuality { rssi: 99, ber: 99 }.dbm(), None);
    }

    #[test]
    fn registration() {
        assert!(RegistrationStatus::from_stat(1).is_registered());
        assert!(RegistrationStatus::from_stat(5).is_registered());
        assert!(!RegistrationStatus::from_stat(2).is_registered());
        assert_eq!(RegistrationStatus::from_stat(4), RegistrationStatus::Unknown);
    }
}
