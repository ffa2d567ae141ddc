//! Transparent blob-storage offloading for large messages
//!
//! Messaging transports impose a maximum record size. This crate lets a
//! pipeline handle payloads of any size: payloads at or below a configured
//! threshold travel inline, unchanged; larger payloads are written to blob
//! storage and replaced in the message by a one-byte-flagged URI reference.
//! A matching retriever detects which case applies and reconstitutes the
//! original bytes.
//!
//! # Features
//!
//! - Byte-exact framing: one flag byte distinguishes inline from backed
//!   payloads; absent payloads pass through untouched
//! - Deterministic object paths: `<base-path><topic>/<keys|values>/<id>`
//! - Per-scheme client routing on the read side with a single-flight cache,
//!   so expensive client construction happens once per scheme
//! - Pluggable [`BlobStorageClient`] backends and [`IdGenerator`]s, with
//!   in-memory and local-filesystem reference implementations
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use futures::FutureExt;
//! use large_message_core::{
//!     BlobStorageClient, BlobStorageUri, InMemoryClient, LargeMessageRetrievingClient,
//!     LargeMessageStoringClient, Sha256HashIdGenerator,
//! };
//!
//! # async fn example() -> large_message_core::Result<()> {
//! let client = Arc::new(InMemoryClient::new());
//!
//! // Producer side: payloads above 1 MiB are offloaded to blob storage
//! let storer = LargeMessageStoringClient::builder(client.clone())
//!     .max_size(1024 * 1024)
//!     .base_path(BlobStorageUri::parse("memory://bucket/base/")?)
//!     .id_generator(Arc::new(Sha256HashIdGenerator))
//!     .build();
//! let framed = storer.store_bytes(Some("topic"), Some(b"payload"), false).await?;
//!
//! // Consumer side: resolves clients by URI scheme, lazily and once
//! let retriever = LargeMessageRetrievingClient::new().with_factory(
//!     InMemoryClient::SCHEME,
//!     Box::new(move || {
//!         let client = client.clone();
//!         async move { Ok(client as Arc<dyn BlobStorageClient>) }.boxed()
//!     }),
//! );
//! let payload = retriever.retrieve_bytes(framed.as_deref()).await?;
//! assert_eq!(payload.as_deref(), Some(&b"payload"[..]));
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod id_generator;
mod payload;
mod retrieving;
mod storing;
#[cfg(test)]
mod testing;
mod uri;

pub use client::{BlobStorageClient, InMemoryClient, LocalFileClient};
pub use config::LargeMessageConfig;
pub use error::{LargeMessageError, Result};
pub use id_generator::{IdGenerator, RandomUuidGenerator, Sha256HashIdGenerator};
pub use payload::{LargeMessagePayload, IS_BACKED, IS_NOT_BACKED};
pub use retrieving::{ClientFactory, LargeMessageRetrievingClient};
pub use storing::{LargeMessageStoringClient, LargeMessageStoringClientBuilder};
pub use uri::BlobStorageUri;
