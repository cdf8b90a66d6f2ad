//! The [`XbeeDriver`] type: owns the transport and receive ring, and is the
//! crate's main entry point.
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # fn main() {
//! use xbee_api::driver::XbeeDriver;
//! use xbee_api::test_support::MockTransport;
//!
//! let transport = MockTransport::new();
//! let mut storage = [0u8; 64];
//! let mut driver = XbeeDriver::new(transport, &mut storage);
//!
//! // driver.at_command(1, *b"AP", &[]).unwrap();
//! # let _ = &mut driver;
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```

use crate::address::{Address, RemoteAddress};
use crate::bringup;
use crate::error::{BringupError, EmitError, FillError};
use crate::frame::request;
use crate::ring::RecvRing;
use crate::scanner::decode_frame;
use crate::transport::Transport;

/// Owns a transport and its receive ring, and exposes the driver's public
/// operations: the one-time bring-up sequence, the request builders, the raw
/// frame emitter, and the non-blocking frame receiver.
///
/// Not reentrant: a single `XbeeDriver` must not be accessed from more than
/// one context (thread, interrupt handler) concurrently. See the crate-level
/// documentation for the full reentrancy contract.
#[derive(Debug)]
pub struct XbeeDriver<'a, T: Transport> {
    transport: T,
    ring: RecvRing<'a>,
}

impl<'a, T: Transport> XbeeDriver<'a, T> {
    /// Wraps `transport` and `ring_storage` into a driver without running
    /// the bring-up sequence. Use this when the radio is already known to be
    /// in API mode with escapes and hardware flow control (for example,
    /// after a warm restart where bring-up already ran once).
    pub fn new(transport: T, ring_storage: &'a mut [u8]) -> Self {
        XbeeDriver {
            transport,
            ring: RecvRing::new(ring_storage),
        }
    }

    /// Wraps `transport` and `ring_storage` into a driver and runs the
    /// one-time bring-up sequence: forces AT command mode, enables API mode
    /// with escapes and hardware flow control, and verifies each setting
    /// took effect by querying it back.
    pub fn open(transport: T, ring_storage: &'a mut [u8]) -> Result<Self, BringupError<T::Error>> {
        let mut driver = Self::new(transport, ring_storage);
        bringup::bring_up(&mut driver.transport, &mut driver.ring)?;
        Ok(driver)
    }

    /// Writes a single frame with API id `api_id` followed by `payload`.
    /// This is the primitive the request builders are implemented on top
    /// of; use it directly for an API frame type this crate doesn't provide
    /// a dedicated builder for.
    pub fn send_frame(&mut self, api_id: u8, payload: &[u8]) -> Result<(), EmitError<T::Error>> {
        let mut w = crate::codec::FrameWriter::start(
            &mut self.transport,
            (payload.len() + 1) as u16,
        )?;
        w.write_payload(&mut self.transport, &[api_id])?;
        w.write_payload(&mut self.transport, payload)?;
        w.finish(&mut self.transport)
    }

    /// Issues an AT command, optionally carrying a parameter to set.
    pub fn at_command(
        &mut self,
        frame_id: u8,
        command: [u8; 2],
        param: &[u8],
    ) -> Result<(), EmitError<T::Error>> {
        request::at_command(&mut self.transport, frame_id, command, param)
    }

    /// Queues an AT command parameter to be applied on the next `AC`/`CN`.
    pub fn at_queue_parameter(
        &mut self,
        frame_id: u8,
        command: [u8; 2],
        param: &[u8],
    ) -> Result<(), EmitError<T::Error>> {
        request::at_queue_parameter(&mut self.transport, frame_id, command, param)
    }

    /// Issues an AT command to a remote radio.
    pub fn remote_at_command(
        &mut self,
        address: RemoteAddress,
        options: u8,
        frame_id: u8,
        command: [u8; 2],
        param: &[u8],
    ) -> Result<(), EmitError<T::Error>> {
        request::remote_at_command(&mut self.transport, address, options, frame_id, command, param)
    }

    /// Transmits `data` to `address`.
    pub fn transmit(
        &mut self,
        address: Address,
        frame_id: u8,
        option: u8,
        data: &[u8],
    ) -> Result<(), EmitError<T::Error>> {
        request::transmit(&mut self.transport, address, frame_id, option, data)
    }

    /// Attempts to produce the next complete, checksum-valid frame into
    /// `out`, without blocking.
    ///
    /// Returns `Ok(n)` with the frame's un-escaped payload in `out[..n]`, or
    /// `Err(nb::Error::WouldBlock)` if no complete frame is buffered yet (the
    /// caller should retry after giving the transport a chance to produce
    /// more bytes). A transport error while refilling the ring is the only
    /// way this can fail outright.
    pub fn recv_frame(&mut self, out: &mut [u8]) -> nb::Result<usize, FillError<T::Error>> {
        let n = decode_frame(&mut self.ring, out);
        if n > 0 {
            return Ok(n);
        }

        self.ring.fill(&mut self.transport)?;

        let n = decode_frame(&mut self.ring, out);
        if n > 0 {
            Ok(n)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;
    use nb::block;

    #[test]
    fn send_frame_wraps_payload_with_given_api_id() {
        let mut storage = [0u8; 32];
        let mut driver = XbeeDriver::new(MockTransport::new(), &mut storage);
        driver.send_frame(0x08, &[0x01, b'A', b'P']).unwrap();
    }

    #[test]
    fn recv_frame_blocks_until_data_arrives_then_yields_a_frame() {
        let mut storage = [0u8; 32];
        let mut driver = XbeeDriver::new(MockTransport::new(), &mut storage);

        let mut out = [0u8; 16];
        assert_eq!(driver.recv_frame(&mut out), Err(nb::Error::WouldBlock));

        // AT_RESPONSE frame_id=1 "AP" status=0
        let frame = [0x7E, 0x00, 0x05, 0x88, 0x01, 0x41, 0x50, 0x00, 0xE5];
        driver.transport.push_inbound(&frame);

        let n = block!(driver.recv_frame(&mut out)).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&out[..5], &[0x88, 0x01, 0x41, 0x50, 0x00]);
    }
}
