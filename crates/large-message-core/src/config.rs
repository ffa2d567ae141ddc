//! Configuration value object for the storing side.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::BlobStorageClient;
use crate::error::Result;
use crate::id_generator::IdGenerator;
use crate::storing::LargeMessageStoringClient;
use crate::uri::BlobStorageUri;

/// Configuration for large message handling.
///
/// Values typically arrive from an external configuration loader; this type
/// carries them explicitly instead of a property map, so misconfiguration
/// surfaces as an error return when the config is turned into a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LargeMessageConfig {
    /// Maximum payload size, in bytes, carried inline. Payloads of exactly
    /// this size stay inline; larger payloads offload to blob storage.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Base path offloaded objects are stored under, as a
    /// `scheme://bucket/prefix/` URI string. Required only when payloads
    /// actually offload.
    #[serde(default)]
    pub base_path: Option<String>,
}

fn default_max_size() -> usize {
    usize::MAX
}

impl Default for LargeMessageConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            base_path: None,
        }
    }
}

impl LargeMessageConfig {
    /// Build a storing client from this configuration.
    ///
    /// Fails if the configured base path is not a valid blob storage URI.
    /// The id generator may be omitted when the threshold guarantees no
    /// payload ever offloads.
    pub fn storer(
        &self,
        client: Arc<dyn BlobStorageClient>,
        id_generator: Option<Arc<dyn IdGenerator>>,
    ) -> Result<LargeMessageStoringClient> {
        let mut builder = LargeMessageStoringClient::builder(client).max_size(self.max_size);
        if let Some(raw) = &self.base_path {
            builder = builder.base_path(BlobStorageUri::parse(raw)?);
        }
        if let Some(id_generator) = id_generator {
            builder = builder.id_generator(id_generator);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryClient;
    use crate::error::LargeMessageError;
    use crate::id_generator::Sha256HashIdGenerator;

    #[test]
    fn default_never_offloads() {
        let config = LargeMessageConfig::default();
        assert_eq!(config.max_size, usize::MAX);
        assert!(config.base_path.is_none());
    }

    #[tokio::test]
    async fn builds_storer_from_config() {
        let config = LargeMessageConfig {
            max_size: 0,
            base_path: Some("memory://bucket/base/".to_owned()),
        };
        let client = Arc::new(InMemoryClient::new());
        let storer = config
            .storer(client.clone(), Some(Arc::new(Sha256HashIdGenerator)))
            .unwrap();

        let framed = storer
            .store_bytes(Some("topic"), Some(b"payload"), false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(framed[0], crate::payload::IS_BACKED);
        assert_eq!(client.object_count(), 1);
    }

    #[test]
    fn rejects_malformed_base_path() {
        let config = LargeMessageConfig {
            max_size: 0,
            base_path: Some("not a uri".to_owned()),
        };
        let result = config.storer(Arc::new(InMemoryClient::new()), None);
        assert!(matches!(result, Err(LargeMessageError::UriParse(_))));
    }
}
