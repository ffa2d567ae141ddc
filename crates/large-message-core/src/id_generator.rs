//! Id generation for offloaded objects.
//!
//! The generated id becomes the last segment of the object key, so it must
//! be unique per stored payload (or deterministically content-derived, which
//! additionally de-duplicates identical payloads).

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Produces the identifier an offloaded payload is stored under.
pub trait IdGenerator: Send + Sync {
    /// Generate an id for the given raw payload bytes.
    fn generate_id(&self, data: &[u8]) -> String;
}

/// Random UUID v4 per call; ids are unique regardless of payload content.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUuidGenerator;

impl IdGenerator for RandomUuidGenerator {
    fn generate_id(&self, _data: &[u8]) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Hex-encoded SHA-256 of the payload.
///
/// Deterministic: storing the same bytes twice yields the same object key,
/// so repeated payloads overwrite rather than accumulate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256HashIdGenerator;

impl IdGenerator for Sha256HashIdGenerator {
    fn generate_id(&self, data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }
}
