/// Errors returned by the crate
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Composed command or stored setting does not fit its fixed buffer.
    /// Raised before anything is written to the transport.
    ComposeOverflow,
    /// Expected token never appeared within the retry policy
    Timeout,
    /// Serial channel is not open or has gone away. Never retried.
    TransportUnavailable,
    /// Serial read error
    Read,
    /// Serial write error
    Write,
    /// Exchange was aborted through a [`CancelToken`](crate::CancelToken)
    Cancelled,
    /// Failed to parse received response
    Parse,
    /// Operation needs an IP address or domain name plus port, but none is stored
    MissingEndpoint,
    /// Modem status line did not come up after the power key pulse
    PoweredDown,
    /// Peripheral pin could not be driven or sampled
    Pin,
}

impl Error {
    pub(crate) fn from_io<E: embedded_io::Error>(e: &E, fallback: Self) -> Self {
        use embedded_io::ErrorKind;

        match e.kind() {
            ErrorKind::NotConnected | ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
                Self::TransportUnavailable
            }
            _ => fallback,
        }
    }
}
