//! Destination/source addressing for transmit and remote-AT frames.
//!
//! The wire format distinguishes four address kinds, but only three of them
//! are legal as the target of a remote AT command — see [`RemoteAddress`].
//! Using a tagged enum here (rather than the union-plus-type-tag the
//! original driver used) makes the illegal fourth combination simply
//! unrepresentable.

/// A destination or source radio address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// A specific 64-bit hardware (serial number) address.
    Addr64(u64),
    /// A specific 16-bit network address assigned by the coordinator.
    Addr16(u16),
    /// The 64-bit broadcast address (`0x000000000000FFFF`).
    Broadcast64,
    /// The 16-bit broadcast address (`0xFFFF`).
    Broadcast16,
}

impl Address {
    /// The 8-byte big-endian encoding used wherever a frame carries a
    /// 64-bit address field.
    pub(crate) fn bytes64(self) -> [u8; 8] {
        match self {
            Address::Addr64(addr) => addr.to_be_bytes(),
            Address::Broadcast64 => [0, 0, 0, 0, 0, 0, 0xFF, 0xFF],
            Address::Addr16(_) | Address::Broadcast16 => {
                unreachable!("bytes64 only called on a 64-bit address variant")
            }
        }
    }

    /// The 2-byte big-endian encoding used wherever a frame carries a
    /// 16-bit network address field.
    pub(crate) fn bytes16(self) -> [u8; 2] {
        match self {
            Address::Addr16(addr) => addr.to_be_bytes(),
            Address::Broadcast16 => [0xFF, 0xFF],
            Address::Addr64(_) | Address::Broadcast64 => {
                unreachable!("bytes16 only called on a 16-bit address variant")
            }
        }
    }

    /// True if this address should be encoded through the 16-bit address
    /// frame fields rather than the 64-bit ones.
    pub(crate) fn is_16_bit(self) -> bool {
        matches!(self, Address::Addr16(_) | Address::Broadcast16)
    }
}

/// A remote AT command target.
///
/// Unlike [`Address`], there is no 16-bit broadcast variant: the remote AT
/// command frame's 16-bit network address field is always either a specific
/// network address or the fixed `0xFFFE` "unknown/don't care" placeholder
/// that accompanies a 64-bit address, so a caller can never construct a
/// remote AT command that silently falls back to addressing nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAddress {
    /// A specific 64-bit hardware address.
    Addr64(u64),
    /// A specific 16-bit network address.
    Addr16(u16),
    /// The 64-bit broadcast address.
    Broadcast64,
}

impl RemoteAddress {
    /// The 8-byte 64-bit address field and 2-byte 16-bit address field as
    /// they appear back to back in a remote AT command frame.
    pub(crate) fn fields(self) -> ([u8; 8], [u8; 2]) {
        match self {
            RemoteAddress::Addr64(addr) => (addr.to_be_bytes(), [0xFF, 0xFE]),
            RemoteAddress::Addr16(addr) => ([0, 0, 0, 0, 0, 0, 0xFF, 0xFE], addr.to_be_bytes()),
            RemoteAddress::Broadcast64 => ([0, 0, 0, 0, 0, 0, 0xFF, 0xFF], [0xFF, 0xFE]),
        }
    }
}
