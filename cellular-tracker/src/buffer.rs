use heapless::Vec;

use crate::helpers::SliceExt;

/// Default capacity of the response buffer, in bytes.
pub const RESPONSE_CAPACITY: usize = 100;

/// Serial receive buffer for a single command exchange.
///
/// Bytes past the capacity are dropped and the buffer is flagged as
/// truncated. Matching only ever looks at the bytes received since the last
/// [`clear`](Self::clear), never at leftovers of a previous exchange.
#[derive(Debug, Default)]
pub struct ResponseBuffer<const N: usize = RESPONSE_CAPACITY> {
    buf: Vec<u8, N>,
    truncated: bool,
}

impl<const N: usize> ResponseBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            truncated: false,
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.truncated = false;
    }

    /// Append a received byte. Returns `false` if the buffer is full and the
    /// byte was dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.buf.push(byte).is_err() {
            self.truncated = true;
            false
        } else {
            true
        }
    }

    pub fn contains(&self, token: &[u8]) -> bool {
        self.buf.find(token).is_some()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Whether bytes were dropped since the last clear
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn filled<const N: usize>(data: &[u8]) -> ResponseBuffer<N> {
        let mut buf = ResponseBuffer::new();
        for b in data {
            buf.push(*b);
        }
        buf
    }

    #[test]
    fn clear_forgets_previous_exchange() {
        let mut buf: ResponseBuffer = filled(b"\r\nOK\r\n");
        assert!(buf.contains(b"OK"));

        buf.clear();
        assert!(buf.is_empty());
        assert!(!buf.contains(b"OK"));
        assert!(!buf.contains(b"\r\n"));
        assert!(!buf.contains(&[0]));
        assert!(!buf.is_truncated());
    }

    #[test]
    fn overrun_keeps_prefix() {
        let mut buf: ResponseBuffer<8> = filled(b"+CSQ: 17");
        assert!(!buf.is_truncated());
        assert_eq!(buf.len(), buf.capacity());

        assert!(!buf.push(b','));
        assert!(buf.is_truncated());
        assert_eq!(buf.as_slice(), b"+CSQ: 17");
        assert!(buf.contains(b"CSQ"));
        assert!(!buf.contains(b"17,"));
    }

    #[test]
    fn token_split_across_pushes() {
        let mut buf: ResponseBuffer = filled(b"\r\nCONNECT O");
        assert!(!buf.contains(b"CONNECT OK"));
        buf.push(b'K');
        assert!(buf.contains(b"CONNECT OK"));
    }
}
