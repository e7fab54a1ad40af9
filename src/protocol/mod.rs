//! Protocol Module
//!
//! Defines the wire protocol spoken with the UI-automation agent.
//!
//! ## Frame Format (newline-delimited JSON)
//!
//! ```text
//! ┌──────────────────────────────────────────┬──────┐
//! │       JSON object (UTF-8, one line)      │ '\n' │
//! └──────────────────────────────────────────┴──────┘
//! ```
//!
//! No length prefix, no compression, no TLS. Standard JSON string escaping
//! guarantees the object itself never contains a raw newline.
//!
//! ### Requests
//! Every request carries an `id` and a `type`; remaining fields are
//! command-specific (`include_text`, `text`, `key`, ...).
//!
//! ### Responses
//! One JSON line per request, in request order. The client does not validate
//! the shape beyond it being JSON, apart from the optional `id` check done by
//! the client.

mod request;
mod response;
mod codec;

pub use request::Request;
pub use response::Response;
pub use codec::{
    encode_request, decode_response, write_request, read_response, FRAME_DELIMITER,
};
