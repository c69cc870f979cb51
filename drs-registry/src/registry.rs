//! The object registry, providing lookup, bundle expansion and access resolution.
//!

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::instrument;

use crate::error::Error::{CyclicBundle, InternalError, InvalidObject, NotFound, UpstreamTimeout};
use crate::error::Result;
use crate::object::{
  AccessMethod, AccessMethodType, AccessUrl, Checksum, ChecksumAlgorithm, ContentsObject,
  DrsObject,
};
use crate::signer::{StaticSigner, UrlSigner};

/// The default timeout applied to url signing calls.
pub const DEFAULT_SIGNER_TIMEOUT: Duration = Duration::from_secs(5);

/// Trait representing the read operations a DRS server performs against its
/// backing store. All operations are pure reads and implementations must be
/// safe to call concurrently.
#[async_trait]
pub trait ObjectRegistry: Send + Sync {
  /// Look up an object by its opaque id.
  async fn get(&self, object_id: &str) -> Result<DrsObject>;

  /// Expand a bundle's contents. When `recursive` is false the object is
  /// returned with the direct children already stored for it. When true,
  /// every descendant bundle is materialized transitively. Blobs are
  /// returned unchanged either way.
  async fn expand(&self, object: DrsObject, recursive: bool) -> Result<DrsObject>;

  /// Produce a fetchable url for the access method identified by `access_id`
  /// on the object identified by `object_id`.
  async fn resolve_access(&self, object_id: &str, access_id: &str) -> Result<AccessUrl>;
}

/// An object registry backed by an in-memory map, loaded once at startup.
/// Cheap to clone and safe to share across request handlers.
#[derive(Clone)]
pub struct InMemoryRegistry {
  objects: Arc<HashMap<String, DrsObject>>,
  signer: Option<Arc<dyn UrlSigner>>,
  signer_timeout: Duration,
}

impl InMemoryRegistry {
  /// Create a registry from validated objects. Fails if any object violates
  /// the blob and bundle invariants or if two objects share an id.
  pub fn from_objects(objects: Vec<DrsObject>) -> Result<Self> {
    let mut map = HashMap::with_capacity(objects.len());
    for object in objects {
      object.validate()?;
      let id = object.id().to_string();
      if map.insert(id.clone(), object).is_some() {
        return Err(InvalidObject(format!("duplicate object id `{id}`")));
      }
    }

    Ok(Self {
      objects: Arc::new(map),
      signer: None,
      signer_timeout: DEFAULT_SIGNER_TIMEOUT,
    })
  }

  /// Create a registry from a JSON file containing an array of objects.
  pub fn from_path(path: &Path) -> Result<Self> {
    let objects: Vec<DrsObject> = serde_json::from_slice(&fs::read(path)?)?;
    Self::from_objects(objects)
  }

  /// Set the url signer used for access id style methods.
  pub fn with_signer(mut self, signer: Arc<dyn UrlSigner>) -> Self {
    self.signer = Some(signer);
    self
  }

  /// Set the timeout applied to url signing calls.
  pub fn with_signer_timeout(mut self, signer_timeout: Duration) -> Self {
    self.signer_timeout = signer_timeout;
    self
  }

  /// A registry holding the example dataset: a bundle `example_drs` with
  /// children `a` and `b`, where `a` is itself a bundle with child `c`.
  pub fn example() -> Self {
    const HOST: &str = "drs.example.org";
    const DIGEST: &str = "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae";

    let created_time = "2022-02-04T05:28:01.648Z"
      .parse()
      .expect("expected valid timestamp");
    let checksum = || Checksum::new(ChecksumAlgorithm::Sha256, DIGEST);

    let c = DrsObject::builder("c", HOST, created_time)
      .with_name("c")
      .with_size(1024)
      .with_mime_type("application/octet-stream")
      .with_checksum(checksum())
      .with_access_method(
        AccessMethod::new(AccessMethodType::Https)
          .with_access_url(AccessUrl::new("https://example.com/data/c"))
          .with_access_id("direct-https"),
      )
      .build()
      .expect("expected valid example object");

    let a = DrsObject::builder("a", HOST, created_time)
      .with_name("a")
      .with_checksum(checksum())
      .with_contents(vec![ContentsObject::new("c")
        .with_id("c")
        .with_drs_uri(format!("drs://{HOST}/c"))])
      .build()
      .expect("expected valid example object");

    let b = DrsObject::builder("b", HOST, created_time)
      .with_name("b")
      .with_size(2048)
      .with_mime_type("application/octet-stream")
      .with_checksum(checksum())
      .with_access_method(
        AccessMethod::new(AccessMethodType::Https)
          .with_access_url(AccessUrl::new("https://example.com/data/b")),
      )
      .with_access_method(
        AccessMethod::new(AccessMethodType::S3)
          .with_access_id("signed-s3")
          .with_region("us-east-1"),
      )
      .build()
      .expect("expected valid example object");

    let example_drs = DrsObject::builder("example_drs", HOST, created_time)
      .with_name("example_drs")
      .with_version("1.0")
      .with_description("An example bundle served by drs-rs.")
      .with_checksum(checksum())
      .with_contents(vec![
        ContentsObject::new("a")
          .with_id("a")
          .with_drs_uri(format!("drs://{HOST}/a")),
        ContentsObject::new("b")
          .with_id("b")
          .with_drs_uri(format!("drs://{HOST}/b")),
      ])
      .build()
      .expect("expected valid example object");

    let signer = StaticSigner::default().with_url(
      "b",
      "signed-s3",
      AccessUrl::new("https://example-bucket.s3.amazonaws.com/b?X-Amz-Signature=example"),
    );

    Self::from_objects(vec![c, a, b, example_drs])
      .expect("expected valid example objects")
      .with_signer(Arc::new(signer))
  }

  /// Depth first expansion of a set of contents entries. The `path` set holds
  /// the ids of the bundles currently on the traversal path, guarding against
  /// containment cycles.
  fn expand_entries(
    &self,
    entries: Vec<ContentsObject>,
    path: &mut HashSet<String>,
  ) -> Result<Vec<ContentsObject>> {
    entries
      .into_iter()
      .map(|mut entry| {
        let Some(id) = entry.id().map(ToString::to_string) else {
          // Not independently addressable, but its inline contents may still
          // reference registered bundles.
          if let Some(nested) = entry.contents().map(|nested| nested.to_vec()) {
            entry.set_contents(self.expand_entries(nested, path)?);
          }
          return Ok(entry);
        };

        let child = self
          .objects
          .get(&id)
          .ok_or_else(|| NotFound(format!("no object found with id `{id}`")))?;

        if child.is_bundle() {
          if !path.insert(id.clone()) {
            return Err(CyclicBundle(format!(
              "bundle `{id}` transitively contains itself"
            )));
          }

          let contents = child.contents().unwrap_or_default().to_vec();
          entry.set_contents(self.expand_entries(contents, path)?);

          path.remove(&id);
        }

        Ok(entry)
      })
      .collect()
  }
}

impl Debug for InMemoryRegistry {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("InMemoryRegistry")
      .field("objects", &self.objects.len())
      .field("signer_timeout", &self.signer_timeout)
      .finish_non_exhaustive()
  }
}

#[async_trait]
impl ObjectRegistry for InMemoryRegistry {
  #[instrument(level = "trace", skip(self))]
  async fn get(&self, object_id: &str) -> Result<DrsObject> {
    self
      .objects
      .get(object_id)
      .cloned()
      .ok_or_else(|| NotFound(format!("no object found with id `{object_id}`")))
  }

  #[instrument(level = "trace", skip(self, object))]
  async fn expand(&self, mut object: DrsObject, recursive: bool) -> Result<DrsObject> {
    if !recursive || object.is_blob() {
      return Ok(object);
    }

    let mut path = HashSet::from([object.id().to_string()]);
    let contents = object.take_contents();
    object.set_contents(self.expand_entries(contents, &mut path)?);

    Ok(object)
  }

  #[instrument(level = "trace", skip(self))]
  async fn resolve_access(&self, object_id: &str, access_id: &str) -> Result<AccessUrl> {
    let object = self.get(object_id).await?;

    let method = object
      .access_methods()
      .iter()
      .find(|method| method.access_id() == Some(access_id))
      .ok_or_else(|| {
        NotFound(format!(
          "no access method with access id `{access_id}` on object `{object_id}`"
        ))
      })?;

    // A stored url wins, the signer is only consulted for indirect methods.
    if let Some(access_url) = method.access_url() {
      return Ok(access_url.clone());
    }

    let signer = self.signer.as_ref().ok_or_else(|| {
      InternalError(format!(
        "access id `{access_id}` on object `{object_id}` requires a url signer but none is configured"
      ))
    })?;

    timeout(self.signer_timeout, signer.sign(object_id, access_id))
      .await
      .map_err(|_| {
        UpstreamTimeout(format!(
          "url signing timed out after {:?} for access id `{access_id}` on object `{object_id}`",
          self.signer_timeout
        ))
      })?
  }
}
