//! Minimal RFC 5322 message entity
//!
//! A parsed message is an ordered header list plus an opaque body. The
//! bridge only ever touches named headers as text; the body passes through
//! byte-exact. Header values are stored as decoded text (`mailparse`
//! unfolds and decodes encoded words tolerantly, so a badly encoded header
//! yields best-effort text rather than a failure).

use std::io::{Read, Write};
use thiserror::Error;

/// Error type for message parsing and I/O
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("could not read mail message: {0}")]
    Parse(String),

    #[error("could not read mail message: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
struct Header {
    name: String,
    text: String,
}

/// A mail message as an ordered header list plus an opaque body
#[derive(Debug, Clone)]
pub struct Message {
    headers: Vec<Header>,
    body: Vec<u8>,
}

impl Message {
    /// Parse a message from raw bytes
    pub fn parse(raw: &[u8]) -> Result<Self, MessageError> {
        let (headers, body_offset) =
            mailparse::parse_headers(raw).map_err(|e| MessageError::Parse(e.to_string()))?;

        let headers = headers
            .iter()
            .map(|h| Header {
                name: h.get_key(),
                text: h.get_value(),
            })
            .collect();

        Ok(Self {
            headers,
            body: raw[body_offset..].to_vec(),
        })
    }

    /// Read a full message from a reader and parse it
    pub fn read_from(reader: &mut impl Read) -> Result<Self, MessageError> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        Self::parse(&raw)
    }

    /// Decoded text of the first header with this name, case-insensitive
    pub fn header_text(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.text.clone())
    }

    /// Set a header's text
    ///
    /// Replaces the value of the first matching header in place, keeping
    /// header order. An absent header is only created for a non-empty
    /// value: a message without the header stays without it when the new
    /// value is empty.
    pub fn set_header_text(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(name))
        {
            Some(header) => header.text = value.to_string(),
            None if !value.is_empty() => self.headers.push(Header {
                name: name.to_string(),
                text: value.to_string(),
            }),
            None => {}
        }
    }

    /// The message body, untouched
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Serialize headers, separator and body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for header in &self.headers {
            buf.extend_from_slice(header.name.as_bytes());
            buf.push(b':');
            if !header.text.is_empty() {
                buf.push(b' ');
                buf.extend_from_slice(header.text.as_bytes());
            }
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(&self.body);
        buf
    }

    /// Serialize the message to a writer
    pub fn write_to(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}
