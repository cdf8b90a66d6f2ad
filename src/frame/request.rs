//! Builders for the four outbound API frame types.
//!
//! Each function writes a complete frame (start delimiter, length, payload,
//! checksum) straight to the transport through [`FrameWriter`]; none of them
//! buffer the frame locally first.

use crate::address::{Address, RemoteAddress};
use crate::codec::FrameWriter;
use crate::consts::{
    API_ID_AT_COMMAND, API_ID_AT_QUEUE_PARAMETER, API_ID_REMOTE_AT_COMMAND, API_ID_TRANSMIT_16,
    API_ID_TRANSMIT_64,
};
use crate::error::EmitError;
use crate::transport::Transport;

/// Issues an AT command, optionally carrying a parameter to set. An empty
/// `param` queries the current value instead of changing it.
pub fn at_command<T: Transport + ?Sized>(
    transport: &mut T,
    frame_id: u8,
    command: [u8; 2],
    param: &[u8],
) -> Result<(), EmitError<T::Error>> {
    let payload_len = 4 + param.len();
    let mut w = FrameWriter::start(transport, payload_len as u16)?;
    w.write_payload(transport, &[API_ID_AT_COMMAND, frame_id, command[0], command[1]])?;
    w.write_payload(transport, param)?;
    w.finish(transport)
}

/// Queues an AT command parameter to be applied on the next `AC` (or `CN`)
/// command, rather than immediately.
pub fn at_queue_parameter<T: Transport + ?Sized>(
    transport: &mut T,
    frame_id: u8,
    command: [u8; 2],
    param: &[u8],
) -> Result<(), EmitError<T::Error>> {
    let payload_len = 4 + param.len();
    let mut w = FrameWriter::start(transport, payload_len as u16)?;
    w.write_payload(
        transport,
        &[API_ID_AT_QUEUE_PARAMETER, frame_id, command[0], command[1]],
    )?;
    w.write_payload(transport, param)?;
    w.finish(transport)
}

/// Issues an AT command to a remote radio, identified by `address`.
#[allow(clippy::too_many_arguments)]
pub fn remote_at_command<T: Transport + ?Sized>(
    transport: &mut T,
    address: RemoteAddress,
    options: u8,
    frame_id: u8,
    command: [u8; 2],
    param: &[u8],
) -> Result<(), EmitError<T::Error>> {
    let (addr64, addr16) = address.fields();
    let payload_len = 15 + param.len();
    let mut w = FrameWriter::start(transport, payload_len as u16)?;
    w.write_payload(transport, &[API_ID_REMOTE_AT_COMMAND, frame_id])?;
    w.write_payload(transport, &addr64)?;
    w.write_payload(transport, &addr16)?;
    w.write_payload(transport, &[options, command[0], command[1]])?;
    w.write_payload(transport, param)?;
    w.finish(transport)
}

/// Transmits `data` to `address`, choosing the 64-bit or 16-bit addressed
/// frame variant to match the address kind.
pub fn transmit<T: Transport + ?Sized>(
    transport: &mut T,
    address: Address,
    frame_id: u8,
    option: u8,
    data: &[u8],
) -> Result<(), EmitError<T::Error>> {
    if address.is_16_bit() {
        let addr = address.bytes16();
        let payload_len = 5 + data.len();
        let mut w = FrameWriter::start(transport, payload_len as u16)?;
        w.write_payload(
            transport,
            &[API_ID_TRANSMIT_16, frame_id, addr[0], addr[1], option],
        )?;
        w.write_payload(transport, data)?;
        w.finish(transport)
    } else {
        let addr = address.bytes64();
        let payload_len = 11 + data.len();
        let mut w = FrameWriter::start(transport, payload_len as u16)?;
        w.write_payload(transport, &[API_ID_TRANSMIT_64, frame_id])?;
        w.write_payload(transport, &addr)?;
        w.write_payload(transport, &[option])?;
        w.write_payload(transport, data)?;
        w.finish(transport)
    }
}
