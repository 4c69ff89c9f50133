//! Serial transport to the device.
//!
//! Messages are line-delimited JSON frames at a fixed baud rate. The
//! transport owns the port and its lifecycle; it knows nothing about the
//! macro tree.

pub mod framing;
pub mod link;
pub mod protocol;

// Re-export the transport surface
pub use framing::LineFramer;
pub use link::{LinkEvent, LinkState, SerialLink, TransportError};
pub use protocol::{Command, Request, Response};
