//! Shared mock implementations for the crate's tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::client::{BlobStorageClient, InMemoryClient};
use crate::error::Result;
use crate::id_generator::IdGenerator;

/// In-memory client recording every interaction, for verifying call counts
/// and arguments.
#[derive(Default)]
pub(crate) struct CountingClient {
    inner: InMemoryClient,
    puts: Mutex<Vec<(String, String)>>,
    gets: AtomicUsize,
    deletes: Mutex<Vec<(String, String)>>,
}

impl CountingClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put_calls(&self) -> usize {
        self.puts.lock().len()
    }

    pub(crate) fn puts(&self) -> Vec<(String, String)> {
        self.puts.lock().clone()
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub(crate) fn deletes(&self) -> Vec<(String, String)> {
        self.deletes.lock().clone()
    }
}

#[async_trait]
impl BlobStorageClient for CountingClient {
    async fn put_object(&self, data: &[u8], bucket: &str, key: &str) -> Result<String> {
        self.puts.lock().push((bucket.to_owned(), key.to_owned()));
        self.inner.put_object(data, bucket, key).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_object(bucket, key).await
    }

    async fn delete_all_objects(&self, bucket: &str, prefix: &str) -> Result<()> {
        self.deletes
            .lock()
            .push((bucket.to_owned(), prefix.to_owned()));
        self.inner.delete_all_objects(bucket, prefix).await
    }
}

/// Client whose every operation fails, simulating blob storage outages.
pub(crate) struct FailingClient;

#[async_trait]
impl BlobStorageClient for FailingClient {
    async fn put_object(&self, _data: &[u8], _bucket: &str, _key: &str) -> Result<String> {
        Err(anyhow!("simulated put failure").into())
    }

    async fn get_object(&self, _bucket: &str, _key: &str) -> Result<Bytes> {
        Err(anyhow!("simulated get failure").into())
    }

    async fn delete_all_objects(&self, _bucket: &str, _prefix: &str) -> Result<()> {
        Err(anyhow!("simulated delete failure").into())
    }
}

/// Id generator returning a fixed id, for deterministic path assertions.
pub(crate) struct FixedIdGenerator {
    id: String,
}

impl FixedIdGenerator {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl IdGenerator for FixedIdGenerator {
    fn generate_id(&self, _data: &[u8]) -> String {
        self.id.clone()
    }
}

/// Build a retrieval factory serving out clones of an existing client.
pub(crate) fn shared_client_factory(
    client: Arc<dyn BlobStorageClient>,
) -> crate::retrieving::ClientFactory {
    use futures::FutureExt;
    Box::new(move || {
        let client = client.clone();
        async move { Ok(client) }.boxed()
    })
}
