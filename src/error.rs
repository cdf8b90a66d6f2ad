//! Error types for the framing codec, scanner, parser, and bring-up helper.
//!
//! Every error kind named in the protocol design gets its own variant so a
//! caller can distinguish, say, "wrong baud rate" from "device absent" from
//! "settings rejected" without parsing a message string.

use core::fmt;

/// Which phase of frame emission a [`EmitError`] happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitPhase {
    /// Writing the start delimiter and length.
    Start,
    /// Writing the frame payload.
    Payload,
    /// Writing the checksum.
    Finish,
}

impl fmt::Display for EmitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmitPhase::Start => "frame start",
            EmitPhase::Payload => "frame payload",
            EmitPhase::Finish => "frame finish",
        })
    }
}

/// Failure while emitting a framed, escaped, checksummed frame.
///
/// A short write (the transport accepted fewer bytes than asked) and a
/// transport error are kept distinct: a short write still leaves the stream
/// in a well-defined, if truncated, state, whereas a transport error means
/// the transport itself has something to say about why.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitError<E: fmt::Debug> {
    /// The transport accepted fewer bytes than requested during `phase`.
    #[error("short write during {phase}: wrote {wrote} of {expected} bytes")]
    ShortWrite {
        /// Which phase of the frame the short write happened in.
        phase: EmitPhase,
        /// Bytes actually written.
        wrote: usize,
        /// Bytes requested to be written.
        expected: usize,
    },
    /// The transport itself reported an error during `phase`.
    #[error("transport error during {phase}: {source:?}")]
    Transport {
        /// Which phase of the frame the transport error happened in.
        phase: EmitPhase,
        /// The underlying transport error.
        source: E,
    },
}

/// Failure filling the receive ring from the transport.
///
/// This is the only way an error can propagate out of [`crate::driver::XbeeDriver::recv_frame`];
/// everything else the scanner sees (garbage, truncated frames, bad
/// checksums) is recovered from internally by dropping bytes.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("transport error while filling receive buffer: {0:?}")]
pub struct FillError<E: fmt::Debug>(
    /// The underlying transport error.
    pub E,
);

/// Failure decoding an already-unescaped API frame payload.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The payload was shorter than the minimum length for its API id.
    #[error("frame too short for API id {api_id:#04x}: got {got} bytes")]
    WrongLength {
        /// The API id the frame declared.
        api_id: u8,
        /// The number of payload bytes actually present.
        got: usize,
    },
    /// The payload's first byte did not match any supported API id.
    #[error("unknown API id {0:#04x}")]
    UnknownApiId(
        /// The API id byte that was not recognized.
        u8,
    ),
}

/// Failure during the one-time bring-up sequence that puts the radio into
/// API mode with escapes and hardware flow control.
///
/// Each check in the sequence gets a distinct variant so the embedder can
/// tell a wrong baud rate (nothing ever answers `+++`) apart from a radio
/// that answered but rejected the configuration commands.
#[derive(thiserror::Error, Debug)]
pub enum BringupError<E: fmt::Debug> {
    /// Draining stale input before sending `+++` failed.
    #[error("transport error while draining input: {0:?}")]
    Drain(
        /// The underlying transport error.
        E,
    ),
    /// Sending the `+++` escape sequence failed.
    #[error("transport error while sending the +++ escape sequence: {0:?}")]
    EscapeWrite(
        /// The underlying transport error.
        E,
    ),
    /// The transport accepted fewer than the 3 bytes of `+++`.
    #[error("short write sending +++: wrote {wrote} of 3 bytes")]
    EscapeShortWrite {
        /// Bytes actually written.
        wrote: usize,
    },
    /// Reading the radio's response to `+++` failed.
    #[error("transport error while reading AT command mode acknowledgement: {0:?}")]
    AtAckRead(
        /// The underlying transport error.
        E,
    ),
    /// The radio did not answer `+++` with `OK\r`.
    #[error("radio did not acknowledge AT command mode with OK\\r")]
    NoAtAck,
    /// Sending the API-mode and flow-control configuration commands failed.
    #[error("transport error while sending configuration commands: {0:?}")]
    ConfigWrite(
        /// The underlying transport error.
        E,
    ),
    /// The transport accepted fewer bytes than the full configuration
    /// command string.
    #[error("short write sending configuration commands: wrote {wrote} of {expected} bytes")]
    ConfigShortWrite {
        /// Bytes actually written.
        wrote: usize,
        /// Bytes that make up the full configuration command string.
        expected: usize,
    },
    /// Reading an `OK\r` acknowledgement for a configuration command failed.
    #[error("transport error while reading configuration acknowledgements: {0:?}")]
    ConfigAckRead(
        /// The underlying transport error.
        E,
    ),
    /// The `index`'th configuration command was not acknowledged with `OK\r`.
    #[error("configuration acknowledgement {index} was not OK\\r")]
    ConfigAckWrong {
        /// Index (0-based) of the `ATAP 2\rATD7 1\rATD6 1\rATCN\r` acknowledgement.
        index: usize,
    },
    /// Emitting one of the verification AT queries failed.
    #[error("sending AT query frame failed: {0}")]
    QueryEmit(
        /// The underlying emit failure.
        #[from]
        EmitError<E>,
    ),
    /// Reading the response to an AT query failed at the transport level.
    #[error("transport error while awaiting AT query response: {0:?}")]
    QueryRead(
        /// The underlying transport error.
        E,
    ),
    /// No response frame arrived for an AT query.
    #[error("no response frame arrived for AT query {command:?}")]
    QueryNoResponse {
        /// The two-character AT command that was queried.
        command: [u8; 2],
    },
    /// The response frame to an AT query failed to parse.
    #[error("AT query response frame failed to parse: {0}")]
    QueryParse(
        /// The underlying parse failure.
        #[from]
        ParseError,
    ),
    /// The response frame to an AT query had the wrong API id.
    #[error("AT query response had API id {got:#04x}, expected an AT command response")]
    QueryWrongApi {
        /// The API id actually present.
        got: u8,
    },
    /// The response frame's frame id did not match the query's.
    #[error("AT query response frame id {got} did not match expected {expected}")]
    QueryWrongFrameId {
        /// The frame id actually present.
        got: u8,
        /// The frame id that was expected.
        expected: u8,
    },
    /// The response frame's command did not match the query's.
    #[error("AT query response command {got:?} did not match expected {expected:?}")]
    QueryWrongCommand {
        /// The command actually present.
        got: [u8; 2],
        /// The command that was expected.
        expected: [u8; 2],
    },
    /// The radio rejected an AT query (non-zero status byte).
    #[error("AT query {command:?} returned non-zero status {status:#04x}")]
    QueryStatus {
        /// The two-character AT command that was queried.
        command: [u8; 2],
        /// The status byte the radio returned.
        status: u8,
    },
    /// The radio's AT query response did not carry the expected value.
    #[error("AT query {command:?} returned an unexpected value")]
    QueryWrongValue {
        /// The two-character AT command that was queried.
        command: [u8; 2],
    },
}
