//! # xbee-api
//!
//! A portable, no_std Rust driver for the XBee Series 1 radio's API-mode
//! wire protocol with escapes, over an asynchronous serial link with
//! hardware flow control (pins D6/D7).
//!
//! This driver implements:
//! - the byte-stuffing escape codec and running checksum (`codec`)
//! - a caller-owned circular receive buffer with indexed lookahead (`ring`)
//! - a resynchronizing frame scanner (`scanner`)
//! - request builders for AT command, queued AT parameter, remote AT
//!   command, and transmit frames (`frame::request`)
//! - a zero-copy response parser (`frame::response`)
//! - the one-time bring-up sequence that forces API mode with escapes and
//!   hardware flow control (`bringup`)
//!
//! ## Crate features
//! | Feature      | Description |
//! |--------------|-------------|
//! | `std`        | Disables `#![no_std]` and enables the `test_support` mock transport |
//! | `log`        | Emits scanner resync and bring-up diagnostics via the `log` crate |
//! | `defmt-0-3`  | Same diagnostics via `defmt` instead |
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # fn main() {
//! use xbee_api::driver::XbeeDriver;
//! use xbee_api::test_support::MockTransport;
//!
//! let transport = MockTransport::new();
//! let mut ring_storage = [0u8; 128];
//! let mut driver = XbeeDriver::new(transport, &mut ring_storage);
//! driver.at_command(1, *b"AP", &[]).unwrap();
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```
//!
//! ## Integration notes
//!
//! - A single `XbeeDriver` must not be shared across concurrent callers; it
//!   keeps no internal locking. See [`driver::XbeeDriver`] for details.
//! - This crate allocates nothing: the receive ring and every decode buffer
//!   are borrowed from the caller for as long as the driver lives.
//! - [`driver::XbeeDriver::open`] performs the bring-up sequence and assumes
//!   the radio is already answering at the host's configured baud rate.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

/// Emits a trace-level diagnostic through whichever of `log`/`defmt-0-3` is
/// enabled; a no-op with neither. Used at scanner resync points and other
/// routine, non-erroneous events worth surfacing to an embedder who has
/// wired up logging.
#[macro_export]
macro_rules! diag_trace {
    ($msg:literal) => {{
        #[cfg(feature = "log")]
        log::trace!($msg);
        #[cfg(feature = "defmt-0-3")]
        defmt::trace!($msg);
    }};
}

/// Emits a warn-level diagnostic through whichever of `log`/`defmt-0-3` is
/// enabled; a no-op with neither. Used for byte drops and bring-up failures:
/// events that are handled (not propagated as panics) but that an embedder
/// debugging a flaky link will want visibility into.
#[macro_export]
macro_rules! diag_warn {
    ($msg:literal) => {{
        #[cfg(feature = "log")]
        log::warn!($msg);
        #[cfg(feature = "defmt-0-3")]
        defmt::warn!($msg);
    }};
}

pub mod address;
pub mod bringup;
pub mod codec;
pub mod consts;
pub mod driver;
pub mod error;
pub mod frame;
pub mod ring;
pub mod scanner;
pub mod transport;

#[cfg(feature = "std")]
pub mod test_support;

pub use address::{Address, RemoteAddress};
pub use driver::XbeeDriver;
pub use frame::{ParsedFrame, parse_frame};
pub use transport::Transport;
