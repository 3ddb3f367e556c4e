use crate::helpers::{lines, LossyStr, SliceExt};
use crate::Error;

/// Read-only view of the bytes collected during a successful exchange.
///
/// The view borrows the dispatcher's receive buffer, so it must be consumed
/// (or copied out) before the next command is sent.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Response<'a> {
    bytes: &'a [u8],
    attempt: u8,
}

impl<'a> Response<'a> {
    pub(crate) fn new(bytes: &'a [u8], attempt: u8) -> Self {
        Self { bytes, attempt }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn as_str(&self) -> Result<&'a str, Error> {
        core::str::from_utf8(self.bytes).map_err(|_| Error::Parse)
    }

    pub fn contains(&self, token: &[u8]) -> bool {
        self.bytes.find(token).is_some()
    }

    /// Non-empty lines of the response, including any command echo
    pub fn lines(&self) -> impl Iterator<Item = &'a [u8]> {
        lines(self.bytes)
    }

    /// First line starting with `prefix`, with the prefix stripped, e.g. the
    /// parameters of `+CSQ: 17,0` for prefix `+CSQ: `.
    pub fn line_with_prefix(&self, prefix: &[u8]) -> Option<&'a [u8]> {
        self.lines()
            .find_map(|line| line.strip_prefix(prefix))
            .map(|rest| rest.trim(&[b' ', b'\t']))
    }

    /// The attempt (starting at 1) on which the expected token was received
    pub fn attempt(&self) -> u8 {
        self.attempt
    }
}

impl core::fmt::Debug for Response<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Response")
            .field("bytes", &LossyStr(self.bytes))
            .field("attempt", &self.attempt)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Response<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Response {{ bytes: {=[u8]:a}, attempt: {} }}",
            self.bytes,
            self.attempt
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prefixed_line() {
        let response = Response::new(b"AT+CSQ\r\r\n+CSQ: 17,0\r\n\r\nOK\r\n", 1);
        assert_eq!(response.line_with_prefix(b"+CSQ:"), Some(&b"17,0"[..]));
        assert_eq!(response.line_with_prefix(b"+CREG:"), None);
        assert!(response.contains(b"OK"));
        assert_eq!(response.lines().count(), 3);
    }

    #[test]
    fn invalid_utf8() {
        let response = Response::new(&[b'O', 0xFF, b'K'], 2);
        assert_eq!(response.as_str(), Err(Error::Parse));
        assert_eq!(response.attempt(), 2);
    }
}
