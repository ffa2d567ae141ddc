//! Wire framing distinguishing inline from blob-backed payloads.
//!
//! A framed payload is a single flag byte followed by the body. For inline
//! payloads the body is the original bytes verbatim; for backed payloads it
//! is the UTF-8 encoding of the [`BlobStorageUri`] the bytes were stored at.
//! The flag byte is always present, even for zero-length bodies; only the
//! absence of a payload altogether (`None` at the API surface) skips framing.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{LargeMessageError, Result};
use crate::uri::BlobStorageUri;

/// Flag marking a payload carried inline in the message.
pub const IS_NOT_BACKED: u8 = 0x00;

/// Flag marking a payload stored on blob storage.
pub const IS_BACKED: u8 = 0x01;

/// A decoded large-message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LargeMessagePayload {
    /// Payload small enough to travel in the message itself.
    Inline(Bytes),
    /// Payload stored on blob storage; the message carries only its address.
    Backed(BlobStorageUri),
}

impl LargeMessagePayload {
    /// Encode into the one-byte-flag-plus-body wire form.
    pub fn serialize(&self) -> Bytes {
        match self {
            Self::Inline(body) => {
                let mut buf = BytesMut::with_capacity(1 + body.len());
                buf.put_u8(IS_NOT_BACKED);
                buf.put_slice(body);
                buf.freeze()
            }
            Self::Backed(uri) => {
                let raw = uri.to_string();
                let mut buf = BytesMut::with_capacity(1 + raw.len());
                buf.put_u8(IS_BACKED);
                buf.put_slice(raw.as_bytes());
                buf.freeze()
            }
        }
    }

    /// Decode from the wire form.
    ///
    /// Fails with [`LargeMessageError::InvalidFlag`] when the first byte is
    /// neither marker, and with a URI error when a backed body is not a valid
    /// blob storage address. An empty slice is malformed: even zero-length
    /// payloads keep their flag byte.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let (&flag, body) = data
            .split_first()
            .ok_or(LargeMessageError::EmptyPayload)?;
        match flag {
            IS_NOT_BACKED => Ok(Self::Inline(Bytes::copy_from_slice(body))),
            IS_BACKED => {
                let raw = String::from_utf8(body.to_vec())?;
                Ok(Self::Backed(BlobStorageUri::parse(&raw)?))
            }
            other => Err(LargeMessageError::InvalidFlag(other)),
        }
    }
}

/// Encode a backed frame around the URI string reported by the blob client.
///
/// The string is carried verbatim; it is not normalized through
/// [`BlobStorageUri`] so the frame reflects exactly what the client returned.
pub(crate) fn serialize_backed_reference(stored_uri: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + stored_uri.len());
    buf.put_u8(IS_BACKED);
    buf.put_slice(stored_uri.as_bytes());
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_round_trip() {
        let payload = LargeMessagePayload::Inline(Bytes::from_static(b"foo"));
        let framed = payload.serialize();
        assert_eq!(framed.as_ref(), b"\x00foo");
        assert_eq!(LargeMessagePayload::deserialize(&framed).unwrap(), payload);
    }

    #[test]
    fn inline_empty_body_keeps_flag_byte() {
        let payload = LargeMessagePayload::Inline(Bytes::new());
        let framed = payload.serialize();
        assert_eq!(framed.as_ref(), b"\x00");
        assert_eq!(LargeMessagePayload::deserialize(&framed).unwrap(), payload);
    }

    #[test]
    fn backed_round_trip() {
        let uri = BlobStorageUri::parse("s3://bucket/base/topic/values/id").unwrap();
        let payload = LargeMessagePayload::Backed(uri.clone());
        let framed = payload.serialize();
        assert_eq!(framed[0], IS_BACKED);
        assert_eq!(&framed[1..], b"s3://bucket/base/topic/values/id");
        assert_eq!(
            LargeMessagePayload::deserialize(&framed).unwrap(),
            LargeMessagePayload::Backed(uri)
        );
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(matches!(
            LargeMessagePayload::deserialize(b"\x02foo"),
            Err(LargeMessageError::InvalidFlag(0x02))
        ));
    }

    #[test]
    fn rejects_empty_frame() {
        assert!(matches!(
            LargeMessagePayload::deserialize(b""),
            Err(LargeMessageError::EmptyPayload)
        ));
    }

    #[test]
    fn rejects_backed_frame_with_invalid_utf8() {
        assert!(matches!(
            LargeMessagePayload::deserialize(b"\x01\xff\xfe"),
            Err(LargeMessageError::InvalidUri(_))
        ));
    }

    #[test]
    fn rejects_backed_frame_with_malformed_uri() {
        assert!(matches!(
            LargeMessagePayload::deserialize(b"\x01not-a-uri"),
            Err(LargeMessageError::UriParse(_))
        ));
    }
}
