//! Structured addresses for objects on blob storage.

use std::fmt;

use crate::error::{LargeMessageError, Result};

/// Address of an object (or object prefix) on blob storage.
///
/// Canonical string form is `scheme://bucket/key`. The scheme selects which
/// [`BlobStorageClient`](crate::BlobStorageClient) handles the object, the
/// bucket and key are passed to that client verbatim. Immutable once built.
///
/// Bucket names are not restricted to valid URL authorities (e.g.
/// `s3://my_bucket/...` is a legal address), so parsing is done on the raw
/// string rather than through a generic URL parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobStorageUri {
    scheme: String,
    bucket: String,
    key: String,
}

impl BlobStorageUri {
    /// Parse a URI of the form `scheme://bucket/key`.
    ///
    /// The key may be empty (`s3://bucket/` and `s3://bucket` both yield an
    /// empty key); the scheme and bucket must not be.
    pub fn parse(raw: &str) -> Result<Self> {
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| LargeMessageError::UriParse(format!("missing scheme: '{raw}'")))?;
        if scheme.is_empty() {
            return Err(LargeMessageError::UriParse(format!(
                "missing scheme: '{raw}'"
            )));
        }
        let (bucket, key) = match rest.split_once('/') {
            Some((bucket, key)) => (bucket, key),
            None => (rest, ""),
        };
        if bucket.is_empty() {
            return Err(LargeMessageError::UriParse(format!(
                "missing bucket: '{raw}'"
            )));
        }
        Ok(Self {
            scheme: scheme.to_owned(),
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }

    /// URI scheme, e.g. `s3`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Bucket the object lives in.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key within the bucket. May be empty for a bucket-level address.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Return a new URI with `suffix` appended to the key.
    ///
    /// No separator is inserted; callers building paths terminate segments
    /// with `/` themselves.
    pub fn join(&self, suffix: &str) -> Self {
        Self {
            scheme: self.scheme.clone(),
            bucket: self.bucket.clone(),
            key: format!("{}{}", self.key, suffix),
        }
    }
}

impl fmt::Display for BlobStorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

impl std::str::FromStr for BlobStorageUri {
    type Err = LargeMessageError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
