//! Error types for the large message protocol.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LargeMessageError>;

/// Errors raised while storing or retrieving large message payloads.
#[derive(Debug, thiserror::Error)]
pub enum LargeMessageError {
    /// Storing a payload on blob storage requires a topic to derive the
    /// object path from.
    #[error("topic must not be null")]
    MissingTopic,

    /// Storing or deleting payloads on blob storage requires a configured
    /// base path.
    #[error("base path must not be null")]
    MissingBasePath,

    /// Storing a payload on blob storage requires a configured id generator.
    #[error("id generator must not be null")]
    MissingIdGenerator,

    /// A backed payload references a URI scheme with no registered client
    /// factory.
    #[error("unknown scheme for blob storage client: '{0}'")]
    UnknownScheme(String),

    /// The first byte of a framed payload is neither the backed nor the
    /// non-backed marker.
    #[error("message can only be marked as backed or non-backed, got flag {0:#04x}")]
    InvalidFlag(u8),

    /// A framed payload without even the flag byte. Absent payloads are
    /// `None`, never an empty frame.
    #[error("framed payload is empty")]
    EmptyPayload,

    /// A blob storage URI string does not match `scheme://bucket/key`.
    #[error("invalid blob storage uri: {0}")]
    UriParse(String),

    /// The body of a backed frame is not valid UTF-8.
    #[error("backed payload does not contain a valid uri: {0}")]
    InvalidUri(#[from] std::string::FromUtf8Error),

    /// Failure reported by the underlying blob storage client, propagated
    /// unchanged.
    #[error("blob storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
