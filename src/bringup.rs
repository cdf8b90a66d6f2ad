//! The one-time sequence that configures a freshly-connected radio for API
//! mode with escapes and hardware flow control.
//!
//! This assumes the radio is currently in transparent (AT) mode at the
//! host's configured baud rate — if the baud rate doesn't match, forcing AT
//! command mode below will simply never get an `OK\r` back, which surfaces
//! as [`BringupError::NoAtAck`].

use crate::consts::{GUARD_TIME_SECS, SETTLE_TIME_SECS};
use crate::error::{BringupError, FillError};
use crate::frame::request;
use crate::frame::response::{ParsedFrame, parse_frame};
use crate::ring::RecvRing;
use crate::scanner::decode_frame;
use crate::transport::Transport;

const CONFIG_COMMANDS: &[u8] = b"ATAP 2\rATD7 1\rATD6 1\rATCN\r";
const OK_CR: &[u8; 3] = b"OK\r";

/// Runs the bring-up sequence against an already-constructed transport and
/// receive ring: drains stale input, forces AT command mode with the
/// guard-time/`+++`/guard-time dance, enables API mode with escapes and
/// bidirectional hardware flow control, and verifies each setting by
/// querying it back over the now-framed link.
pub(crate) fn bring_up<T: Transport>(
    transport: &mut T,
    ring: &mut RecvRing<'_>,
) -> Result<(), BringupError<T::Error>> {
    drain(transport).map_err(BringupError::Drain)?;

    transport.sleep_secs(GUARD_TIME_SECS);
    let wrote = transport.write(b"+++").map_err(BringupError::EscapeWrite)?;
    if wrote != 3 {
        return Err(BringupError::EscapeShortWrite { wrote });
    }
    transport.sleep_secs(GUARD_TIME_SECS);

    let mut ack = [0u8; 3];
    let n = transport.read(&mut ack).map_err(BringupError::AtAckRead)?;
    if n != ack.len() || &ack != OK_CR {
        crate::diag_warn!("bring-up: radio did not acknowledge AT command mode with OK");
        return Err(BringupError::NoAtAck);
    }

    let wrote = transport
        .write(CONFIG_COMMANDS)
        .map_err(BringupError::ConfigWrite)?;
    if wrote != CONFIG_COMMANDS.len() {
        return Err(BringupError::ConfigShortWrite {
            wrote,
            expected: CONFIG_COMMANDS.len(),
        });
    }

    transport.sleep_secs(SETTLE_TIME_SECS);

    for index in 0..4 {
        let mut check = [0u8; 3];
        let n = transport
            .read(&mut check)
            .map_err(BringupError::ConfigAckRead)?;
        if n != check.len() || &check != OK_CR {
            crate::diag_warn!("bring-up: configuration command was not acknowledged with OK");
            return Err(BringupError::ConfigAckWrong { index });
        }
    }

    verify_setting(transport, ring, 1, *b"AP", 0x02)?;
    verify_setting(transport, ring, 2, *b"D7", 0x01)?;
    verify_setting(transport, ring, 3, *b"D6", 0x01)?;

    Ok(())
}

/// Reads and discards whatever is currently sitting in the transport, one
/// poll at a time, until a read returns zero bytes.
fn drain<T: Transport>(transport: &mut T) -> Result<(), T::Error> {
    let mut scratch = [0u8; 16];
    loop {
        let n = transport.read(&mut scratch)?;
        if n == 0 {
            return Ok(());
        }
    }
}

/// Issues an AT query for `command` and verifies the response carries
/// `expected_frame_id`, echoes `command`, reports success, and returns
/// exactly `expected_value`.
fn verify_setting<T: Transport>(
    transport: &mut T,
    ring: &mut RecvRing<'_>,
    expected_frame_id: u8,
    command: [u8; 2],
    expected_value: u8,
) -> Result<(), BringupError<T::Error>> {
    request::at_command(transport, expected_frame_id, command, &[])?;

    let mut frame = [0u8; 16];
    let mut n = decode_frame(ring, &mut frame);
    if n == 0 {
        ring.fill(transport)
            .map_err(|FillError(e)| BringupError::QueryRead(e))?;
        n = decode_frame(ring, &mut frame);
    }
    if n == 0 {
        crate::diag_warn!("bring-up: no response frame arrived for a verification query");
        return Err(BringupError::QueryNoResponse { command });
    }

    match parse_frame(&frame[..n])? {
        ParsedFrame::AtResponse {
            frame_id,
            command: got_command,
            status,
            data,
        } => {
            if frame_id != expected_frame_id {
                return Err(BringupError::QueryWrongFrameId {
                    got: frame_id,
                    expected: expected_frame_id,
                });
            }
            if got_command != command {
                return Err(BringupError::QueryWrongCommand {
                    got: got_command,
                    expected: command,
                });
            }
            if status != 0 {
                return Err(BringupError::QueryStatus { command, status });
            }
            if data != [expected_value] {
                crate::diag_warn!("bring-up: verification query returned an unexpected value");
                return Err(BringupError::QueryWrongValue { command });
            }
            Ok(())
        }
        other => {
            crate::diag_warn!("bring-up: verification query response had the wrong API id");
            Err(BringupError::QueryWrongApi {
                got: response_api_id(&other),
            })
        }
    }
}

fn response_api_id(frame: &ParsedFrame<'_>) -> u8 {
    use crate::consts::*;
    match frame {
        ParsedFrame::ModemStatus { .. } => API_ID_MODEM_STATUS,
        ParsedFrame::TransmitStatus { .. } => API_ID_TRANSMIT_STATUS,
        ParsedFrame::AtResponse { .. } => API_ID_AT_RESPONSE,
        ParsedFrame::RemoteAtResponse { .. } => API_ID_REMOTE_AT_RESPONSE,
        ParsedFrame::Receive { .. } => API_ID_RECEIVE,
        ParsedFrame::Receive16 { .. } => API_ID_RECEIVE_16,
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// A transport that hands back one canned response chunk per `write`
    /// call, modeling a radio that answers each command in turn. Lets a
    /// full bring-up run be exercised without a real clock or UART.
    struct SequencedTransport {
        responses: VecDeque<Vec<u8>>,
        available: VecDeque<u8>,
    }

    impl SequencedTransport {
        fn new(responses: Vec<Vec<u8>>) -> Self {
            SequencedTransport {
                responses: responses.into(),
                available: VecDeque::new(),
            }
        }
    }

    impl embedded_hal::delay::DelayNs for SequencedTransport {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    impl Transport for SequencedTransport {
        type Error = std::convert::Infallible;

        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if let Some(next) = self.responses.pop_front() {
                self.available.extend(next);
            }
            Ok(buf.len())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.available.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.available.pop_front().unwrap();
            }
            Ok(n)
        }
    }

    fn at_response(frame_id: u8, command: [u8; 2], value: u8) -> Vec<u8> {
        let payload = [0x88, frame_id, command[0], command[1], 0x00, value];
        let checksum = 0xFFu8.wrapping_sub(payload.iter().fold(0u8, |a, &b| a.wrapping_add(b)));
        let mut frame = vec![0x7E, 0x00, payload.len() as u8];
        frame.extend_from_slice(&payload);
        frame.push(checksum);
        frame
    }

    #[test]
    fn full_bring_up_sequence_succeeds() {
        let responses = vec![
            OK_CR.to_vec(),
            OK_CR.iter().cycle().take(12).copied().collect(),
            at_response(1, *b"AP", 0x02),
            at_response(2, *b"D7", 0x01),
            at_response(3, *b"D6", 0x01),
        ];
        let mut transport = SequencedTransport::new(responses);
        let mut storage = [0u8; 32];
        let mut ring = RecvRing::new(&mut storage);

        bring_up(&mut transport, &mut ring).unwrap();
    }

    #[test]
    fn rejects_wrong_value_for_a_setting() {
        let responses = vec![
            OK_CR.to_vec(),
            OK_CR.iter().cycle().take(12).copied().collect(),
            at_response(1, *b"AP", 0x01), // wrong: should be 0x02
        ];
        let mut transport = SequencedTransport::new(responses);
        let mut storage = [0u8; 32];
        let mut ring = RecvRing::new(&mut storage);

        let err = bring_up(&mut transport, &mut ring).unwrap_err();
        assert!(matches!(err, BringupError::QueryWrongValue { command } if command == *b"AP"));
    }

    #[test]
    fn no_at_ack_is_reported_distinctly() {
        let mut transport = SequencedTransport::new(vec![b"nope".to_vec()]);
        let mut storage = [0u8; 32];
        let mut ring = RecvRing::new(&mut storage);

        let err = bring_up(&mut transport, &mut ring).unwrap_err();
        assert!(matches!(err, BringupError::NoAtAck));
    }
}
