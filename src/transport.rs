//! The byte-transport abstraction the driver is built against.
//!
//! This is deliberately thin: a UART-like capability set with non-blocking
//! (or short-timeout) reads, best-effort writes, and a coarse sleep used only
//! by the bring-up helper. The driver never assumes more about its transport
//! than "single caller at a time" — see the crate-level docs for the
//! reentrancy contract.

use core::fmt;

/// A byte-oriented transport: read, write, and a coarse delay.
///
/// Implementors back this with a real UART, a loopback buffer for tests, or
/// anything else that can move bytes. `sleep_ms` is provided by the
/// [`embedded_hal::delay::DelayNs`] supertrait rather than invented here,
/// since a coarse delay is exactly what that trait already models.
pub trait Transport: embedded_hal::delay::DelayNs {
    /// Error type for `read`/`write` failures.
    type Error: fmt::Debug;

    /// Attempt to write all of `buf`. Returns the number of bytes actually
    /// written; a return value less than `buf.len()` is a short write and is
    /// treated by callers as a failure of the whole send.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;

    /// Fill as much of `buf` as is currently available. Returns the number
    /// of bytes read, which may be zero if nothing is available. Must not
    /// block indefinitely.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Coarse delay in whole seconds, used only by the bring-up helper's
    /// guard-time and settle-time waits.
    fn sleep_secs(&mut self, seconds: u32) {
        self.delay_ms(seconds.saturating_mul(1000));
    }
}
