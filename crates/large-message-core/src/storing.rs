//! Producer-side client storing oversized payloads on blob storage.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::client::BlobStorageClient;
use crate::error::{LargeMessageError, Result};
use crate::id_generator::IdGenerator;
use crate::payload::{serialize_backed_reference, LargeMessagePayload};
use crate::uri::BlobStorageUri;

/// Key-side path segment of the object path.
const KEY_SEGMENT: &str = "keys";
/// Value-side path segment of the object path.
const VALUE_SEGMENT: &str = "values";

/// Client for storing message payloads, offloading those that exceed the
/// configured maximum size to blob storage.
///
/// Payloads at or below `max_size` are framed inline and never touch the
/// blob client. Larger payloads are written to
/// `<base-path><topic>/<keys|values>/<generated-id>` and replaced by a frame
/// carrying the URI returned by the client. Retrieval is handled by
/// [`LargeMessageRetrievingClient`](crate::LargeMessageRetrievingClient).
pub struct LargeMessageStoringClient {
    client: Arc<dyn BlobStorageClient>,
    base_path: Option<BlobStorageUri>,
    max_size: usize,
    id_generator: Option<Arc<dyn IdGenerator>>,
}

impl LargeMessageStoringClient {
    /// Start building a storing client around the given blob storage client.
    pub fn builder(client: Arc<dyn BlobStorageClient>) -> LargeMessageStoringClientBuilder {
        LargeMessageStoringClientBuilder {
            client,
            base_path: None,
            max_size: usize::MAX,
            id_generator: None,
        }
    }

    /// Store a payload, offloading it to blob storage if it exceeds the
    /// configured maximum size.
    ///
    /// Returns `Ok(None)` for an absent payload. The topic is only required
    /// when the payload actually offloads; inline payloads ignore it.
    pub async fn store_bytes(
        &self,
        topic: Option<&str>,
        payload: Option<&[u8]>,
        is_key: bool,
    ) -> Result<Option<Bytes>> {
        let Some(payload) = payload else {
            return Ok(None);
        };
        if payload.len() <= self.max_size {
            let framed = LargeMessagePayload::Inline(Bytes::copy_from_slice(payload)).serialize();
            return Ok(Some(framed));
        }
        self.store_backed(topic, payload, is_key).await.map(Some)
    }

    async fn store_backed(
        &self,
        topic: Option<&str>,
        payload: &[u8],
        is_key: bool,
    ) -> Result<Bytes> {
        let topic = topic.ok_or(LargeMessageError::MissingTopic)?;
        let base_path = self
            .base_path
            .as_ref()
            .ok_or(LargeMessageError::MissingBasePath)?;
        let id_generator = self
            .id_generator
            .as_ref()
            .ok_or(LargeMessageError::MissingIdGenerator)?;

        let id = id_generator.generate_id(payload);
        let segment = if is_key { KEY_SEGMENT } else { VALUE_SEGMENT };
        let uri = base_path.join(&format!("{topic}/{segment}/{id}"));
        let stored_uri = self
            .client
            .put_object(payload, uri.bucket(), uri.key())
            .await?;
        debug!(uri = %stored_uri, size = payload.len(), "stored large message on blob storage");
        Ok(serialize_backed_reference(&stored_uri))
    }

    /// Delete all objects stored for `topic`, covering both the key and
    /// value sub-paths with a single prefix deletion.
    pub async fn delete_all_files(&self, topic: &str) -> Result<()> {
        let base_path = self
            .base_path
            .as_ref()
            .ok_or(LargeMessageError::MissingBasePath)?;
        let prefix = format!("{}{topic}/", base_path.key());
        self.client
            .delete_all_objects(base_path.bucket(), &prefix)
            .await?;
        debug!(bucket = base_path.bucket(), prefix = %prefix, "deleted all files for topic");
        Ok(())
    }
}

/// Builder for [`LargeMessageStoringClient`].
///
/// The blob storage client is required up front; base path and id generator
/// are optional and only needed once a payload actually offloads.
pub struct LargeMessageStoringClientBuilder {
    client: Arc<dyn BlobStorageClient>,
    base_path: Option<BlobStorageUri>,
    max_size: usize,
    id_generator: Option<Arc<dyn IdGenerator>>,
}

impl LargeMessageStoringClientBuilder {
    /// Base path objects are stored under, e.g. `s3://bucket/base/`.
    /// The key portion must end in `/` (or be empty).
    pub fn base_path(mut self, base_path: BlobStorageUri) -> Self {
        self.base_path = Some(base_path);
        self
    }

    /// Maximum payload size, in bytes, still carried inline. Payloads of
    /// exactly this size stay inline; anything larger offloads.
    /// Defaults to `usize::MAX`, i.e. never offload.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Generator for the id segment of offloaded object keys.
    pub fn id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(id_generator);
        self
    }

    pub fn build(self) -> LargeMessageStoringClient {
        LargeMessageStoringClient {
            client: self.client,
            base_path: self.base_path,
            max_size: self.max_size,
            id_generator: self.id_generator,
        }
    }
}
