//! Scripted serial transport and clock for exercising the dispatcher and the
//! modem operations without hardware.
//!
//! [`MockClock`] advances one millisecond every time it is read, so a busy
//! poll loop makes deterministic progress through time. [`MockTransport`]
//! answers each flushed write with the next queued reply, releasing the reply
//! bytes at scheduled instants on that clock.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::sync::Once;
use std::vec::Vec;

use embassy_time::{Duration, Instant};
use embedded_io::{ErrorKind, ErrorType};

use crate::{CancelToken, Clock};

static INIT: Once = Once::new();

pub fn setup_log() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .is_test(true)
            .init();
    });
}

#[derive(Debug, Clone, Default)]
pub struct MockClock {
    millis: Rc<Cell<u64>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, without advancing the clock
    pub fn peek(&self) -> Instant {
        Instant::from_millis(self.millis.get())
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        let now = self.millis.get();
        self.millis.set(now + 1);
        Instant::from_millis(now)
    }
}

#[derive(Debug, Clone)]
struct Reply {
    delay: Duration,
    spacing: Duration,
    bytes: Vec<u8>,
}

#[derive(Debug)]
struct Inner {
    clock: MockClock,
    rx: VecDeque<(Instant, u8)>,
    replies: VecDeque<Option<Reply>>,
    repeat: Option<Reply>,
    pending: Vec<u8>,
    writes: Vec<(Instant, Vec<u8>)>,
    connected: bool,
    cancel_on_write: Option<(usize, &'static CancelToken)>,
}

impl Inner {
    fn schedule(&mut self, start: Instant, reply: &Reply) {
        let mut at = start + reply.delay;
        for b in &reply.bytes {
            self.rx.push_back((at, *b));
            at += reply.spacing;
        }
        self.rx.make_contiguous().sort_by_key(|(at, _)| *at);
    }

    fn check(&self) -> Result<(), IoError> {
        if self.connected {
            Ok(())
        } else {
            Err(IoError(ErrorKind::NotConnected))
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoError(pub ErrorKind);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl core::error::Error for IoError {}

impl embedded_io::Error for IoError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

impl MockTransport {
    pub fn new(clock: &MockClock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                clock: clock.clone(),
                rx: VecDeque::new(),
                replies: VecDeque::new(),
                repeat: None,
                pending: Vec::new(),
                writes: Vec::new(),
                connected: true,
                cancel_on_write: None,
            })),
        }
    }

    /// Answer the next write with `bytes`, all available immediately
    pub fn reply(&self, bytes: &[u8]) {
        self.reply_after(Duration::from_ticks(0), Duration::from_ticks(0), bytes);
    }

    /// Answer the next write with `bytes`, the first one arriving `delay`
    /// after the write and the rest `spacing` apart.
    pub fn reply_after(&self, delay: Duration, spacing: Duration, bytes: &[u8]) {
        self.inner.borrow_mut().replies.push_back(Some(Reply {
            delay,
            spacing,
            bytes: bytes.to_vec(),
        }));
    }

    /// Do not answer the next write
    pub fn silence(&self) {
        self.inner.borrow_mut().replies.push_back(None);
    }

    /// Answer every write without a queued reply with `bytes`
    pub fn repeat(&self, bytes: &[u8]) {
        self.inner.borrow_mut().repeat = Some(Reply {
            delay: Duration::from_ticks(0),
            spacing: Duration::from_ticks(0),
            bytes: bytes.to_vec(),
        });
    }

    /// Make `bytes` readable at `at`, independent of any write
    pub fn emit_at(&self, at: Instant, bytes: &[u8]) {
        let reply = Reply {
            delay: Duration::from_ticks(0),
            spacing: Duration::from_ticks(0),
            bytes: bytes.to_vec(),
        };
        self.inner.borrow_mut().schedule(at, &reply);
    }

    pub fn disconnect(&self) {
        self.inner.borrow_mut().connected = false;
    }

    /// Cancel `token` as soon as the `nth` write (starting at 1) is flushed
    pub fn cancel_on_write(&self, nth: usize, token: &'static CancelToken) {
        self.inner.borrow_mut().cancel_on_write = Some((nth, token));
    }

    /// Every flushed write, lossily decoded
    pub fn writes(&self) -> Vec<String> {
        self.inner
            .borrow()
            .writes
            .iter()
            .map(|(_, w)| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    pub fn write_times(&self) -> Vec<Instant> {
        self.inner.borrow().writes.iter().map(|(at, _)| *at).collect()
    }

    /// Number of scheduled bytes not yet read
    pub fn unread(&self) -> usize {
        self.inner.borrow().rx.len()
    }
}

impl ErrorType for MockTransport {
    type Error = IoError;
}

impl embedded_io::Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut inner = self.inner.borrow_mut();
        inner.check()?;

        let now = inner.clock.peek();
        let mut n = 0;
        while n < buf.len() {
            let due = matches!(inner.rx.front(), Some((at, _)) if *at <= now);
            if !due {
                break;
            }
            if let Some((_, b)) = inner.rx.pop_front() {
                buf[n] = b;
                n += 1;
            }
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for MockTransport {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let inner = self.inner.borrow();
        inner.check()?;

        let now = inner.clock.peek();
        Ok(matches!(inner.rx.front(), Some((at, _)) if *at <= now))
    }
}

impl embedded_io::Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut inner = self.inner.borrow_mut();
        inner.check()?;

        inner.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let mut inner = self.inner.borrow_mut();
        inner.check()?;

        let now = inner.clock.peek();
        let written = core::mem::take(&mut inner.pending);
        inner.writes.push((now, written));

        let reply = match inner.replies.pop_front() {
            Some(reply) => reply,
            None => inner.repeat.clone(),
        };
        if let Some(reply) = reply {
            inner.schedule(now, &reply);
        }

        if let Some((nth, token)) = inner.cancel_on_write {
            if inner.writes.len() == nth {
                token.cancel();
            }
        }
        Ok(())
    }
}
