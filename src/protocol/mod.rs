//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Request Format
//! ```text
//! ┌────────┬───┬────────────┬───┬────────────┐
//! │  host  │ ␠ │  filename  │ ␠ │ \r\n\r\n   │
//! └────────┴───┴────────────┴───┴────────────┘
//! ```
//!
//! Fields are separated by a single space. The server needs at least two
//! fields; the first is the host, the second the filename. The host is
//! carried but never validated or used for routing.
//!
//! ## Response Format
//! The raw bytes of the requested file. No header, no length prefix: the
//! server closing the connection marks the end of the response. A failed
//! request yields zero bytes.

mod request;
mod response;
mod codec;

pub use request::Request;
pub use response::{read_response, write_response, WriteReport};
pub use codec::{
    encode_request, parse_request, read_request, read_request_line,
    DEFAULT_MAX_REQUEST_SIZE, FIELD_SEPARATOR, TERMINATOR,
};
