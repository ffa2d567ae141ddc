//! Consumer-side client resolving framed payloads back to their bytes.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::client::BlobStorageClient;
use crate::error::{LargeMessageError, Result};
use crate::payload::LargeMessagePayload;
use crate::uri::BlobStorageUri;

/// Constructs the blob storage client for one URI scheme.
///
/// Construction may be expensive (connection setup, credential resolution),
/// so it is async and invoked at most once per scheme per
/// [`LargeMessageRetrievingClient`] instance.
pub type ClientFactory =
    Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn BlobStorageClient>>> + Send + Sync>;

type ClientCell = Arc<OnceCell<Arc<dyn BlobStorageClient>>>;

/// Client for retrieving the actual bytes of payloads framed by
/// [`LargeMessageStoringClient`](crate::LargeMessageStoringClient).
///
/// Inline frames are unwrapped directly. Backed frames are resolved through
/// a per-scheme client registry: the factory registered for the URI's scheme
/// is invoked on first use and the constructed client cached for the
/// lifetime of this instance. Concurrent first accesses to the same scheme
/// single-flight through one construction; unrelated schemes never contend.
pub struct LargeMessageRetrievingClient {
    factories: HashMap<String, ClientFactory>,
    // per-scheme cells so construction of one scheme's client does not
    // block lookups for another
    cache: Mutex<HashMap<String, ClientCell>>,
}

impl LargeMessageRetrievingClient {
    /// Create a retrieving client with no registered schemes.
    ///
    /// Only inline payloads can be resolved until factories are registered
    /// with [`with_factory`](Self::with_factory).
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Register the client factory for a URI scheme.
    pub fn with_factory(mut self, scheme: impl Into<String>, factory: ClientFactory) -> Self {
        self.factories.insert(scheme.into(), factory);
        self
    }

    /// Retrieve a payload that may have been stored on blob storage.
    ///
    /// Returns `Ok(None)` for an absent payload, the inline body for
    /// non-backed frames, and the fetched object for backed frames.
    pub async fn retrieve_bytes(&self, data: Option<&[u8]>) -> Result<Option<Bytes>> {
        let Some(data) = data else {
            return Ok(None);
        };
        match LargeMessagePayload::deserialize(data)? {
            LargeMessagePayload::Inline(body) => Ok(Some(body)),
            LargeMessagePayload::Backed(uri) => self.retrieve_backed(&uri).await.map(Some),
        }
    }

    async fn retrieve_backed(&self, uri: &BlobStorageUri) -> Result<Bytes> {
        let client = self.client_for_scheme(uri.scheme()).await?;
        let bytes = client.get_object(uri.bucket(), uri.key()).await?;
        debug!(uri = %uri, size = bytes.len(), "retrieved large message from blob storage");
        Ok(bytes)
    }

    async fn client_for_scheme(&self, scheme: &str) -> Result<Arc<dyn BlobStorageClient>> {
        let factory = self
            .factories
            .get(scheme)
            .ok_or_else(|| LargeMessageError::UnknownScheme(scheme.to_owned()))?;

        let cell = self
            .cache
            .lock()
            .entry(scheme.to_owned())
            .or_default()
            .clone();

        // single-flight: concurrent callers await one construction; a failed
        // construction leaves the cell empty, so the next access retries
        let client = cell
            .get_or_try_init(|| {
                debug!(scheme, "constructing blob storage client");
                factory()
            })
            .await?;
        Ok(client.clone())
    }
}

impl Default for LargeMessageRetrievingClient {
    fn default() -> Self {
        Self::new()
    }
}
