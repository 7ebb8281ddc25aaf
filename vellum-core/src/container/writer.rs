//! Container construction: an ordered part stream to `multipart/mixed`
//! bytes.
//!
//! Text and metadata parts go out as 8bit UTF-8; image parts are
//! base64 transfer-encoded. The boundary is derived from a fresh UUID
//! so independent sessions never produce colliding markers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use uuid::Uuid;

use crate::types::ImageKind;

use super::{METADATA_MEDIA_TYPE, TEXT_MEDIA_TYPE};

/// Base64 line width for image part bodies
const BASE64_LINE_WIDTH: usize = 76;

/// Builds one transport container. Parts are emitted in push order;
/// no bytes leave until [`finish`](Self::finish).
#[derive(Debug)]
pub struct ContainerWriter {
    boundary: String,
    buffer: Vec<u8>,
}

impl ContainerWriter {
    pub fn new() -> Self {
        let boundary = format!("vellum-{}", Uuid::new_v4());
        let mut buffer = Vec::new();
        buffer.extend_from_slice(b"MIME-Version: 1.0\r\n");
        buffer.extend_from_slice(
            format!("Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\r\n").as_bytes(),
        );
        Self { boundary, buffer }
    }

    /// Append the JSON metadata block as a part
    pub fn push_json(&mut self, value: &Value) -> Result<(), serde_json::Error> {
        let body = serde_json::to_vec_pretty(value)?;
        self.push_part(METADATA_MEDIA_TYPE, "8bit", &body);
        Ok(())
    }

    /// Append a narrative text part
    pub fn push_text(&mut self, text: &str) {
        self.push_part(
            &format!("{TEXT_MEDIA_TYPE}; charset=utf-8"),
            "8bit",
            text.as_bytes(),
        );
    }

    /// Append an image part, base64 transfer-encoded
    pub fn push_image(&mut self, kind: ImageKind, bytes: &[u8]) {
        let encoded = STANDARD.encode(bytes);
        let mut body = Vec::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH + 2);
        for chunk in encoded.as_bytes().chunks(BASE64_LINE_WIDTH) {
            body.extend_from_slice(chunk);
            body.extend_from_slice(b"\r\n");
        }
        self.push_part(kind.media_type(), "base64", &body);
    }

    /// Close the container and return its bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.buffer
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.buffer
    }

    fn push_part(&mut self, content_type: &str, encoding: &str, body: &[u8]) {
        self.buffer
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.buffer
            .extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        self.buffer
            .extend_from_slice(format!("Content-Transfer-Encoding: {encoding}\r\n\r\n").as_bytes());
        self.buffer.extend_from_slice(body);
        self.buffer.extend_from_slice(b"\r\n");
    }
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self::new()
    }
}
