//! Container parsing: raw bytes to an ordered part list.
//!
//! Part boundaries, headers, and transfer encodings are delegated to
//! `mailparse`; this module only flattens the parsed message into the
//! part sequence the decoder walks.

use crate::error::ContainerError;

use super::Part;

/// Parse container bytes into the ordered part list
pub fn read_parts(bytes: &[u8]) -> Result<Vec<Part>, ContainerError> {
    let mail = mailparse::parse_mail(bytes)?;
    if !mail.ctype.mimetype.starts_with("multipart/") {
        return Err(ContainerError::malformed(
            "container is not a multipart message",
        ));
    }
    if mail.subparts.is_empty() {
        return Err(ContainerError::Empty);
    }
    mail.subparts
        .iter()
        .map(|sub| {
            let body = sub.get_body_raw()?;
            Ok(Part {
                media_type: sub.ctype.mimetype.clone(),
                body,
            })
        })
        .collect()
}
