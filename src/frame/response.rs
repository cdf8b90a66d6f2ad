//! Parses an already-unescaped, checksum-verified frame payload into its
//! typed form.
//!
//! Every variant borrows its trailing data straight out of the caller's
//! decode buffer rather than copying it, since the driver never owns
//! storage beyond that buffer.

use crate::consts::{
    API_ID_AT_RESPONSE, API_ID_MODEM_STATUS, API_ID_RECEIVE, API_ID_RECEIVE_16,
    API_ID_REMOTE_AT_RESPONSE, API_ID_TRANSMIT_STATUS,
};
use crate::error::ParseError;

/// A decoded API frame, borrowed from the buffer it was parsed out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedFrame<'a> {
    /// An unsolicited modem status notification.
    ModemStatus {
        /// The modem status code.
        status: u8,
    },
    /// The local radio's report of whether a transmit request was delivered.
    TransmitStatus {
        /// The frame id the original transmit request carried.
        frame_id: u8,
        /// Delivery status (`0` is success).
        status: u8,
    },
    /// The response to a local `at_command` or `at_queue_parameter` request.
    AtResponse {
        /// The frame id the original request carried.
        frame_id: u8,
        /// The two-character AT command this responds to.
        command: [u8; 2],
        /// Command status (`0` is success).
        status: u8,
        /// Command-specific response data, if any.
        data: &'a [u8],
    },
    /// The response to a `remote_at_command` request.
    RemoteAtResponse {
        /// The frame id the original request carried.
        frame_id: u8,
        /// The 64-bit hardware address of the radio that answered.
        responder_address: u64,
        /// The 16-bit network address of the radio that answered.
        responder_network_address: u16,
        /// The two-character AT command this responds to.
        command: [u8; 2],
        /// Command status (`0` is success).
        status: u8,
        /// Command-specific response data, if any.
        data: &'a [u8],
    },
    /// An inbound data packet addressed by 64-bit hardware address.
    Receive {
        /// The sending radio's 64-bit hardware address.
        source_address: u64,
        /// Received signal strength, in -dBm.
        rssi: u8,
        /// Receive option bits.
        options: u8,
        /// The received packet payload.
        data: &'a [u8],
    },
    /// An inbound data packet addressed by 16-bit network address.
    Receive16 {
        /// The sending radio's 16-bit network address.
        source_network_address: u16,
        /// Received signal strength, in -dBm.
        rssi: u8,
        /// Receive option bits.
        options: u8,
        /// The received packet payload.
        data: &'a [u8],
    },
}

fn read_u64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

fn read_u16(bytes: &[u8]) -> u16 {
    (bytes[0] as u16) << 8 | bytes[1] as u16
}

/// Parses `frame` (the un-escaped payload a successful `decode_frame` call
/// produced, API id through the last data byte, checksum already stripped)
/// into its typed form.
pub fn parse_frame(frame: &[u8]) -> Result<ParsedFrame<'_>, ParseError> {
    if frame.is_empty() {
        return Err(ParseError::WrongLength {
            api_id: 0,
            got: frame.len(),
        });
    }
    let api_id = frame[0];

    let require = |min: usize| -> Result<(), ParseError> {
        if frame.len() < min {
            Err(ParseError::WrongLength {
                api_id,
                got: frame.len(),
            })
        } else {
            Ok(())
        }
    };

    match api_id {
        API_ID_MODEM_STATUS => {
            if frame.len() != 2 {
                return Err(ParseError::WrongLength {
                    api_id,
                    got: frame.len(),
                });
            }
            Ok(ParsedFrame::ModemStatus { status: frame[1] })
        }
        API_ID_TRANSMIT_STATUS => {
            if frame.len() != 3 {
                return Err(ParseError::WrongLength {
                    api_id,
                    got: frame.len(),
                });
            }
            Ok(ParsedFrame::TransmitStatus {
                frame_id: frame[1],
                status: frame[2],
            })
        }
        API_ID_AT_RESPONSE => {
            require(5)?;
            Ok(ParsedFrame::AtResponse {
                frame_id: frame[1],
                command: [frame[2], frame[3]],
                status: frame[4],
                data: &frame[5..],
            })
        }
        API_ID_REMOTE_AT_RESPONSE => {
            require(15)?;
            Ok(ParsedFrame::RemoteAtResponse {
                frame_id: frame[1],
                responder_address: read_u64(&frame[2..10]),
                responder_network_address: read_u16(&frame[10..12]),
                command: [frame[12], frame[13]],
                status: frame[14],
                data: &frame[15..],
            })
        }
        API_ID_RECEIVE => {
            require(11)?;
            Ok(ParsedFrame::Receive {
                source_address: read_u64(&frame[1..9]),
                rssi: frame[9],
                options: frame[10],
                data: &frame[11..],
            })
        }
        API_ID_RECEIVE_16 => {
            require(5)?;
            Ok(ParsedFrame::Receive16 {
                source_network_address: read_u16(&frame[1..3]),
                rssi: frame[3],
                options: frame[4],
                data: &frame[5..],
            })
        }
        other => Err(ParseError::UnknownApiId(other)),
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn parses_modem_status() {
        let frame = [API_ID_MODEM_STATUS, 0x06];
        assert_eq!(
            parse_frame(&frame).unwrap(),
            ParsedFrame::ModemStatus { status: 0x06 }
        );
    }

    #[test]
    fn parses_at_response_with_data() {
        let frame = [API_ID_AT_RESPONSE, 0x01, b'A', b'P', 0x00, 0x02];
        assert_eq!(
            parse_frame(&frame).unwrap(),
            ParsedFrame::AtResponse {
                frame_id: 0x01,
                command: [b'A', b'P'],
                status: 0x00,
                data: &[0x02],
            }
        );
    }

    #[test]
    fn assembles_64_bit_address_big_endian_without_overflow() {
        let mut frame = vec![API_ID_RECEIVE];
        frame.extend_from_slice(&[0x00, 0x13, 0xA2, 0x00, 0x40, 0x59, 0x4A, 0x4A]);
        frame.push(0x28); // rssi
        frame.push(0x00); // options
        frame.push(0x42); // one data byte
        match parse_frame(&frame).unwrap() {
            ParsedFrame::Receive { source_address, .. } => {
                assert_eq!(source_address, 0x0013_A200_4059_4A4A);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn assembles_16_bit_address_from_both_bytes() {
        let frame = [API_ID_RECEIVE_16, 0xAB, 0xCD, 0x28, 0x00, 0x42];
        match parse_frame(&frame).unwrap() {
            ParsedFrame::Receive16 {
                source_network_address,
                ..
            } => assert_eq!(source_network_address, 0xABCD),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn rejects_short_remote_at_response() {
        let frame = [API_ID_REMOTE_AT_RESPONSE, 0x01, 0x02, 0x03];
        assert_eq!(
            parse_frame(&frame),
            Err(ParseError::WrongLength {
                api_id: API_ID_REMOTE_AT_RESPONSE,
                got: 4,
            })
        );
    }

    #[test]
    fn rejects_unknown_api_id() {
        let frame = [0xFF, 0x00];
        assert_eq!(parse_frame(&frame), Err(ParseError::UnknownApiId(0xFF)));
    }
}
