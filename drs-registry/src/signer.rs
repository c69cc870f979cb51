//! The url signing seam used when an access method resolves through an access id.
//!

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Error::NotFound;
use crate::error::Result;
use crate::object::AccessUrl;

/// Produces a fetchable url for an access method that uses access id style
/// indirection. Real implementations call out to a credential store to presign
/// urls, so two calls for the same pair may legitimately return different urls.
#[async_trait]
pub trait UrlSigner: Send + Sync {
  /// Produce a url and headers for the access method identified by
  /// `access_id` on the object identified by `object_id`.
  async fn sign(&self, object_id: &str, access_id: &str) -> Result<AccessUrl>;
}

/// A signer which returns urls from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticSigner {
  urls: HashMap<(String, String), AccessUrl>,
}

impl StaticSigner {
  /// Create a new static signer.
  pub fn new(urls: HashMap<(String, String), AccessUrl>) -> Self {
    Self { urls }
  }

  /// Add a url for the (object id, access id) pair.
  pub fn with_url(
    mut self,
    object_id: impl Into<String>,
    access_id: impl Into<String>,
    url: AccessUrl,
  ) -> Self {
    self
      .urls
      .insert((object_id.into(), access_id.into()), url);
    self
  }
}

#[async_trait]
impl UrlSigner for StaticSigner {
  async fn sign(&self, object_id: &str, access_id: &str) -> Result<AccessUrl> {
    self
      .urls
      .get(&(object_id.to_string(), access_id.to_string()))
      .cloned()
      .ok_or_else(|| {
        NotFound(format!(
          "no url for access id `{access_id}` on object `{object_id}`"
        ))
      })
  }
}
