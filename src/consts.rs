//! Wire-level constants for the XBee Series 1 API-with-escapes protocol.
//!
//! These values come straight out of the API frame format: the start
//! delimiter, the escape byte, the bytes that must be byte-stuffed, and the
//! API identifiers for each supported request/response frame type.

/// The only byte that may appear un-escaped outside of a frame start.
pub const FRAME_DELIMITER: u8 = 0x7E;

/// Marks the following byte as escaped; XOR it with [`ESCAPE_XOR`] to recover
/// the original.
pub const ESCAPE_BYTE: u8 = 0x7D;

/// XON, one of the four bytes that must be escaped on the wire.
pub const XON: u8 = 0x11;

/// XOFF, one of the four bytes that must be escaped on the wire.
pub const XOFF: u8 = 0x13;

/// Applied to an escaped byte (after [`ESCAPE_BYTE`]) to recover the original.
pub const ESCAPE_XOR: u8 = 0x20;

/// Returns true if `byte` must be escaped when written to the wire.
#[inline]
pub(crate) fn needs_escape(byte: u8) -> bool {
    matches!(byte, FRAME_DELIMITER | ESCAPE_BYTE | XON | XOFF)
}

/// Minimum number of buffered bytes before a frame could possibly be
/// present: delimiter + 2 length bytes + 1 API id + 1 data byte + checksum.
pub(crate) const MIN_FRAME_BYTES: usize = 6;

// --- API identifiers -------------------------------------------------

/// Transmit request, 64-bit destination address.
pub const API_ID_TRANSMIT_64: u8 = 0x00;
/// Transmit request, 16-bit destination address.
pub const API_ID_TRANSMIT_16: u8 = 0x01;
/// AT command request.
pub const API_ID_AT_COMMAND: u8 = 0x08;
/// Queued AT command parameter request.
pub const API_ID_AT_QUEUE_PARAMETER: u8 = 0x09;
/// Remote AT command request.
pub const API_ID_REMOTE_AT_COMMAND: u8 = 0x17;

/// Modem status response.
pub const API_ID_MODEM_STATUS: u8 = 0x8A;
/// Transmit status response.
pub const API_ID_TRANSMIT_STATUS: u8 = 0x89;
/// AT command response.
pub const API_ID_AT_RESPONSE: u8 = 0x88;
/// Remote AT command response.
pub const API_ID_REMOTE_AT_RESPONSE: u8 = 0x97;
/// Receive packet, 64-bit source address.
pub const API_ID_RECEIVE: u8 = 0x80;
/// Receive packet, 16-bit source address.
pub const API_ID_RECEIVE_16: u8 = 0x81;

/// Guard time (seconds) required before and after the `+++` escape sequence
/// that forces the radio into AT command mode.
pub const GUARD_TIME_SECS: u32 = 1;

/// Time allowed for all AT command acknowledgements to arrive after issuing
/// the API-mode/flow-control configuration sequence.
pub const SETTLE_TIME_SECS: u32 = 1;
