//! The XBee byte-stuffing (escape) codec and running checksum.
//!
//! Outbound: every byte after the start delimiter that equals one of the
//! four reserved values is replaced with an escape byte followed by the
//! original XOR 0x20. Inbound: the same rule run in reverse, with the
//! wrinkle that a literal start delimiter appearing where an escaped byte
//! was expected always means "a new frame is starting here", never
//! "corrupt data" — see [`next_unescaped_byte`].

use crate::consts::{ESCAPE_BYTE, ESCAPE_XOR, FRAME_DELIMITER, needs_escape};
use crate::error::{EmitError, EmitPhase};
use crate::ring::RecvRing;
use crate::transport::Transport;

/// The running `0xFF - sum` checksum accumulator.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Checksum(u8);

impl Checksum {
    pub fn new() -> Self {
        Checksum(0)
    }

    /// Fold one more original (pre-escape) byte into the accumulator.
    pub fn update(&mut self, byte: u8) {
        self.0 = self.0.wrapping_add(byte);
    }

    /// The checksum byte to place on the wire: `0xFF - accumulator`.
    pub fn finish(self) -> u8 {
        0xFFu8.wrapping_sub(self.0)
    }

    /// True once a checksum byte has been folded in alongside the payload
    /// it covers and the total comes to `0xFF`.
    pub fn is_valid(self) -> bool {
        self.0 == 0xFF
    }
}

fn write_exact<T: Transport + ?Sized>(
    transport: &mut T,
    buf: &[u8],
    phase: EmitPhase,
) -> Result<(), EmitError<T::Error>> {
    let n = transport
        .write(buf)
        .map_err(|source| EmitError::Transport { phase, source })?;
    if n != buf.len() {
        crate::diag_warn!("codec: short write, aborting frame emission");
        return Err(EmitError::ShortWrite {
            phase,
            wrote: n,
            expected: buf.len(),
        });
    }
    Ok(())
}

fn write_escaped_byte<T: Transport + ?Sized>(
    transport: &mut T,
    byte: u8,
    phase: EmitPhase,
) -> Result<(), EmitError<T::Error>> {
    if needs_escape(byte) {
        write_exact(transport, &[ESCAPE_BYTE, byte ^ ESCAPE_XOR], phase)
    } else {
        write_exact(transport, &[byte], phase)
    }
}

/// Composes an outbound frame: literal start delimiter, escaped length,
/// escaped payload (folded into the running checksum), escaped checksum.
pub(crate) struct FrameWriter {
    checksum: Checksum,
}

impl FrameWriter {
    /// Writes `0x7E` (unescaped) followed by the escaped big-endian length
    /// and resets the checksum accumulator.
    pub fn start<T: Transport + ?Sized>(
        transport: &mut T,
        payload_len: u16,
    ) -> Result<Self, EmitError<T::Error>> {
        write_exact(transport, &[FRAME_DELIMITER], EmitPhase::Start)?;
        let len_bytes = payload_len.to_be_bytes();
        write_escaped_byte(transport, len_bytes[0], EmitPhase::Start)?;
        write_escaped_byte(transport, len_bytes[1], EmitPhase::Start)?;
        Ok(FrameWriter {
            checksum: Checksum::new(),
        })
    }

    /// Writes `bytes` through the escape codec, folding each original byte
    /// into the running checksum.
    pub fn write_payload<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        bytes: &[u8],
    ) -> Result<(), EmitError<T::Error>> {
        for &b in bytes {
            self.checksum.update(b);
            write_escaped_byte(transport, b, EmitPhase::Payload)?;
        }
        Ok(())
    }

    /// Writes `0xFF - accumulator` through the escape codec. The checksum
    /// byte itself is not folded into the accumulator.
    pub fn finish<T: Transport + ?Sized>(
        self,
        transport: &mut T,
    ) -> Result<(), EmitError<T::Error>> {
        write_escaped_byte(transport, self.checksum.finish(), EmitPhase::Finish)
    }
}

/// Outcome of reading one logical (possibly escaped) byte from the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NextByte {
    /// An un-escaped original byte, with the cursor advanced past it.
    Byte(u8),
    /// A literal start delimiter was found where a frame byte was expected.
    /// Per the wire format this always means a new frame is starting; the
    /// scanner resyncs to it rather than treating it as corrupt data.
    FoundStart,
    /// Not enough buffered data to resolve the next byte yet.
    NeedMoreData,
}

/// Reads one un-escaped byte from `ring` starting at logical offset
/// `*idx`, advancing `*idx` past it (by one byte, or two if it was
/// escaped). `0x7E` is never legal mid-frame: encountering it, whether
/// directly or as the byte following an escape, reports [`NextByte::FoundStart`].
pub(crate) fn next_unescaped_byte(ring: &RecvRing<'_>, idx: &mut usize) -> NextByte {
    if *idx >= ring.len() {
        return NextByte::NeedMoreData;
    }
    let b = ring.peek(*idx);
    if b == FRAME_DELIMITER {
        return NextByte::FoundStart;
    }
    if b == ESCAPE_BYTE {
        if *idx + 1 >= ring.len() {
            return NextByte::NeedMoreData;
        }
        let escaped = ring.peek(*idx + 1);
        if escaped == FRAME_DELIMITER {
            return NextByte::FoundStart;
        }
        *idx += 2;
        return NextByte::Byte(escaped ^ ESCAPE_XOR);
    }
    *idx += 1;
    NextByte::Byte(b)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;

    #[test]
    fn checksum_matches_s1() {
        let mut cs = Checksum::new();
        for b in [0x08, 0x52, 0x4E, 0x4A] {
            cs.update(b);
        }
        assert_eq!(cs.finish(), 0x0D);
    }

    #[test]
    fn emits_literal_delimiter_and_escapes_length() {
        let mut t = MockTransport::new();
        let mut w = FrameWriter::start(&mut t, 4).unwrap();
        w.write_payload(&mut t, &[0x08, 0x11, 0x4E, 0x4A]).unwrap();
        w.finish(&mut t).unwrap();
        assert_eq!(t.written(), [0x7E, 0x00, 0x04, 0x08, 0x7D, 0x31, 0x4E, 0x4A, 0x4E]);
    }

    #[test]
    fn next_unescaped_byte_resolves_escape_pair() {
        let mut storage = [0u8; 8];
        let mut ring = RecvRing::new(&mut storage);
        ring.writable_regions().0[..3].copy_from_slice(&[ESCAPE_BYTE, 0x5E, 0x01]);
        ring.commit(3);
        let mut idx = 0;
        assert_eq!(next_unescaped_byte(&ring, &mut idx), NextByte::Byte(0x7E));
        assert_eq!(idx, 2);
        assert_eq!(next_unescaped_byte(&ring, &mut idx), NextByte::Byte(0x01));
        assert_eq!(idx, 3);
    }

    #[test]
    fn escape_followed_by_delimiter_reports_found_start() {
        let mut storage = [0u8; 8];
        let mut ring = RecvRing::new(&mut storage);
        ring.writable_regions().0[..2].copy_from_slice(&[ESCAPE_BYTE, FRAME_DELIMITER]);
        ring.commit(2);
        let mut idx = 0;
        assert_eq!(next_unescaped_byte(&ring, &mut idx), NextByte::FoundStart);
    }
}
