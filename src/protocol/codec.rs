//! Protocol codec
//!
//! Encoding and decoding functions for the newline-delimited JSON wire format.
//!
//! ## Wire Format
//! ```text
//! {"id":1,"type":"hello"}\n
//! {"id":1,"ok":true}\n
//! ```

use std::io::{BufRead, Read, Write};

use crate::error::{AgentError, Result};
use super::{Request, Response};

/// Line terminator closing every frame
pub const FRAME_DELIMITER: u8 = b'\n';

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request to a complete frame
///
/// Format: compact JSON object + `\n`
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    let mut frame =
        serde_json::to_vec(request).map_err(|e| AgentError::Serialization(e.to_string()))?;
    frame.push(FRAME_DELIMITER);
    Ok(frame)
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a response from one line
///
/// A trailing `\n` (and `\r` before it) is ignored.
pub fn decode_response(line: &[u8]) -> Result<Response> {
    let line = line.strip_suffix(&[FRAME_DELIMITER]).unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    serde_json::from_slice(line)
        .map(Response::new)
        .map_err(|e| AgentError::MalformedResponse(e.to_string()))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a request to a stream
///
/// The whole frame goes out in one `write_all` and is flushed before returning.
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let frame = encode_request(request)?;
    writer
        .write_all(&frame)
        .and_then(|_| writer.flush())
        .map_err(AgentError::from_transport)
}

/// Read exactly one response line from a stream
///
/// Blocks until a `\n` arrives or the peer closes. At most `limit` bytes are
/// consumed; nothing past the first terminator is touched.
pub fn read_response<R: BufRead>(reader: &mut R, limit: usize) -> Result<Response> {
    let mut line = Vec::new();
    let read = reader
        .by_ref()
        .take(limit as u64)
        .read_until(FRAME_DELIMITER, &mut line)
        .map_err(AgentError::from_transport)?;

    if read == 0 {
        return Err(AgentError::ConnectionClosed);
    }

    if line.last() != Some(&FRAME_DELIMITER) {
        // Either the limit cut the line short or the peer hung up mid-line
        if read >= limit {
            return Err(AgentError::ResponseTooLarge { limit });
        }
        return Err(AgentError::ConnectionClosed);
    }

    decode_response(&line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_strips_crlf() {
        let response = decode_response(b"{\"ok\":true}\r\n").unwrap();
        assert_eq!(response.as_value(), &json!({"ok": true}));
    }

    #[test]
    fn test_decode_empty_line_is_malformed() {
        assert!(matches!(
            decode_response(b"\n"),
            Err(AgentError::MalformedResponse(_))
        ));
    }
}
