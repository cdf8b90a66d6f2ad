//! Std-backed test doubles for [`crate::transport::Transport`].
//!
//! A std-gated in-memory loopback transport for unit tests, avoiding an
//! external mocking dependency: a loopback byte queue is all the framing
//! codec and scanner tests need.

use std::collections::VecDeque;

use crate::transport::Transport;

/// The error a [`MockTransport`] reports when told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// A loopback [`Transport`] backed by plain `VecDeque`s, with knobs for
/// injecting short reads/writes and one-shot errors.
#[derive(Debug)]
pub struct MockTransport {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    read_limit: Option<usize>,
    write_limit: Option<usize>,
    fail_next_read: bool,
    fail_next_write: bool,
}

impl MockTransport {
    /// An empty transport: nothing queued to read, nothing written yet.
    pub fn new() -> Self {
        MockTransport {
            inbound: VecDeque::new(),
            outbound: Vec::new(),
            read_limit: None,
            write_limit: None,
            fail_next_read: false,
            fail_next_write: false,
        }
    }

    /// A transport pre-loaded with `bytes` available to read.
    pub fn with_inbound(bytes: &[u8]) -> Self {
        let mut t = Self::new();
        t.push_inbound(bytes);
        t
    }

    /// Queue more bytes to be returned by future `read` calls.
    pub fn push_inbound(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    /// Bytes written so far, in order.
    pub fn written(&self) -> &[u8] {
        &self.outbound
    }

    /// Cap every future `read` at returning at most `n` bytes, simulating a
    /// transport that only ever has a little data available per poll.
    pub fn limit_read(&mut self, n: usize) {
        self.read_limit = Some(n);
    }

    /// Cap every future `write` at accepting at most `n` bytes, simulating
    /// a short write.
    pub fn limit_write(&mut self, n: usize) {
        self.write_limit = Some(n);
    }

    /// Make the next `read` call return `Err(MockError)`.
    pub fn fail_next_read(&mut self) {
        self.fail_next_read = true;
    }

    /// Make the next `write` call return `Err(MockError)`.
    pub fn fail_next_write(&mut self) {
        self.fail_next_write = true;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_hal::delay::DelayNs for MockTransport {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl Transport for MockTransport {
    type Error = MockError;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(MockError);
        }
        let n = self.write_limit.unwrap_or(buf.len()).min(buf.len());
        self.outbound.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(MockError);
        }
        let max = self.read_limit.unwrap_or(buf.len()).min(buf.len());
        let n = max.min(self.inbound.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.inbound.pop_front().expect("checked len above");
        }
        Ok(n)
    }
}
