//! Request builders and response parsing for the API frame types this
//! driver supports.

pub mod request;
pub mod response;

pub use request::{at_command, at_queue_parameter, remote_at_command, transmit};
pub use response::{ParsedFrame, parse_frame};
