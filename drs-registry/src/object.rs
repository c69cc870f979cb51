//! Types representing DRS objects like blobs, bundles, checksums and access methods.
//!

use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error::InvalidObject;
use crate::error::Result;

/// The uri scheme prefix for DRS self uris.
pub const DRS_URI_SCHEME: &str = "drs://";

/// Extract the object id encoded in a `drs://` uri. Returns `None` if the uri
/// does not use the drs scheme or has no id component.
pub fn object_id_from_uri(uri: &str) -> Option<&str> {
  uri
    .strip_prefix(DRS_URI_SCHEME)?
    .split_once('/')
    .map(|(_, id)| id)
    .filter(|id| !id.is_empty())
}

/// An enumeration with all the checksum algorithms a DRS object can declare.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
  #[serde(rename = "sha-256")]
  Sha256,
  #[serde(rename = "sha-512")]
  Sha512,
  #[serde(rename = "md5")]
  Md5,
  #[serde(rename = "etag")]
  Etag,
  #[serde(rename = "crc32c")]
  Crc32c,
  #[serde(rename = "trunc512")]
  Trunc512,
  #[serde(rename = "sha1")]
  Sha1,
}

impl ChecksumAlgorithm {
  /// The digest length in hex characters, where the algorithm has a fixed length.
  pub fn expected_hex_len(&self) -> Option<usize> {
    match self {
      ChecksumAlgorithm::Sha256 => Some(64),
      ChecksumAlgorithm::Sha512 => Some(128),
      ChecksumAlgorithm::Md5 => Some(32),
      ChecksumAlgorithm::Etag => None,
      ChecksumAlgorithm::Crc32c => Some(8),
      ChecksumAlgorithm::Trunc512 => Some(48),
      ChecksumAlgorithm::Sha1 => Some(40),
    }
  }
}

impl Display for ChecksumAlgorithm {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      ChecksumAlgorithm::Sha256 => write!(f, "sha-256"),
      ChecksumAlgorithm::Sha512 => write!(f, "sha-512"),
      ChecksumAlgorithm::Md5 => write!(f, "md5"),
      ChecksumAlgorithm::Etag => write!(f, "etag"),
      ChecksumAlgorithm::Crc32c => write!(f, "crc32c"),
      ChecksumAlgorithm::Trunc512 => write!(f, "trunc512"),
      ChecksumAlgorithm::Sha1 => write!(f, "sha1"),
    }
  }
}

/// A digest and the algorithm that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
  checksum: String,
  #[serde(rename = "type")]
  algorithm: ChecksumAlgorithm,
}

impl Checksum {
  /// Create a new checksum.
  pub fn new(algorithm: ChecksumAlgorithm, checksum: impl Into<String>) -> Self {
    Self {
      checksum: checksum.into(),
      algorithm,
    }
  }

  /// Get the digest.
  pub fn checksum(&self) -> &str {
    &self.checksum
  }

  /// Get the algorithm.
  pub fn algorithm(&self) -> ChecksumAlgorithm {
    self.algorithm
  }

  /// Validate the digest. Hex digests must match the algorithm's expected length.
  pub fn validate(&self) -> Result<()> {
    if self.checksum.is_empty() {
      return Err(InvalidObject(format!(
        "empty `{}` digest",
        self.algorithm
      )));
    }

    let is_hex = self.checksum.chars().all(|char| char.is_ascii_hexdigit());
    if let (true, Some(expected)) = (is_hex, self.algorithm.expected_hex_len()) {
      if self.checksum.len() != expected {
        return Err(InvalidObject(format!(
          "`{}` digest should have {} hex characters, got {}",
          self.algorithm,
          expected,
          self.checksum.len()
        )));
      }
    }

    Ok(())
  }
}

/// An enumeration with all the transports an access method can use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMethodType {
  S3,
  Gs,
  Ftp,
  Gsiftp,
  Globus,
  Htsget,
  Https,
  File,
}

impl Display for AccessMethodType {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      AccessMethodType::S3 => write!(f, "s3"),
      AccessMethodType::Gs => write!(f, "gs"),
      AccessMethodType::Ftp => write!(f, "ftp"),
      AccessMethodType::Gsiftp => write!(f, "gsiftp"),
      AccessMethodType::Globus => write!(f, "globus"),
      AccessMethodType::Htsget => write!(f, "htsget"),
      AccessMethodType::Https => write!(f, "https"),
      AccessMethodType::File => write!(f, "file"),
    }
  }
}

/// A url and the headers required to fetch bytes from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessUrl {
  url: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  headers: Vec<String>,
}

impl AccessUrl {
  /// Create a new access url.
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      headers: Vec::new(),
    }
  }

  /// Set the headers required to fetch the url.
  pub fn with_headers(mut self, headers: Vec<String>) -> Self {
    self.headers = headers;
    self
  }

  /// Get the url.
  pub fn url(&self) -> &str {
    &self.url
  }

  /// Get the headers.
  pub fn headers(&self) -> &[String] {
    &self.headers
  }
}

/// One way of retrieving a blob's bytes, either through a direct url or an
/// access id resolved against the access endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessMethod {
  #[serde(rename = "type")]
  method_type: AccessMethodType,
  #[serde(skip_serializing_if = "Option::is_none")]
  access_url: Option<AccessUrl>,
  #[serde(skip_serializing_if = "Option::is_none")]
  access_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  region: Option<String>,
}

impl AccessMethod {
  /// Create a new access method.
  pub fn new(method_type: AccessMethodType) -> Self {
    Self {
      method_type,
      access_url: None,
      access_id: None,
      region: None,
    }
  }

  /// Set the direct access url.
  pub fn with_access_url(mut self, access_url: AccessUrl) -> Self {
    self.access_url = Some(access_url);
    self
  }

  /// Set the access id.
  pub fn with_access_id(mut self, access_id: impl Into<String>) -> Self {
    self.access_id = Some(access_id.into());
    self
  }

  /// Set the region hint.
  pub fn with_region(mut self, region: impl Into<String>) -> Self {
    self.region = Some(region.into());
    self
  }

  /// Get the transport type.
  pub fn method_type(&self) -> AccessMethodType {
    self.method_type
  }

  /// Get the direct access url.
  pub fn access_url(&self) -> Option<&AccessUrl> {
    self.access_url.as_ref()
  }

  /// Get the access id.
  pub fn access_id(&self) -> Option<&str> {
    self.access_id.as_deref()
  }

  /// Get the region hint.
  pub fn region(&self) -> Option<&str> {
    self.region.as_deref()
  }

  /// Validate that the method can drive a retrieval.
  pub fn validate(&self) -> Result<()> {
    if self.access_url.is_none() && self.access_id.is_none() {
      return Err(InvalidObject(format!(
        "`{}` access method has neither an access_url nor an access_id",
        self.method_type
      )));
    }

    Ok(())
  }
}

/// A named pointer to a child object within a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsObject {
  name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  drs_uri: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  contents: Option<Vec<ContentsObject>>,
}

impl ContentsObject {
  /// Create a new contents object.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      id: None,
      drs_uri: None,
      contents: None,
    }
  }

  /// Set the id of the child, making it independently addressable.
  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = Some(id.into());
    self
  }

  /// Set the drs uri of the child.
  pub fn with_drs_uri(mut self, drs_uri: impl Into<String>) -> Self {
    self.drs_uri = Some(drs_uri.into());
    self
  }

  /// Set the nested contents of the child.
  pub fn with_contents(mut self, contents: Vec<ContentsObject>) -> Self {
    self.contents = Some(contents);
    self
  }

  /// Get the name.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Get the id.
  pub fn id(&self) -> Option<&str> {
    self.id.as_deref()
  }

  /// Get the drs uri.
  pub fn drs_uri(&self) -> Option<&str> {
    self.drs_uri.as_deref()
  }

  /// Get the nested contents.
  pub fn contents(&self) -> Option<&[ContentsObject]> {
    self.contents.as_deref()
  }

  pub(crate) fn set_contents(&mut self, contents: Vec<ContentsObject>) {
    self.contents = Some(contents);
  }
}

/// A single content-addressable entity, either a blob or a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrsObject {
  id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  name: Option<String>,
  self_uri: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  size: Option<u64>,
  created_time: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  updated_time: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  version: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  mime_type: Option<String>,
  checksums: Vec<Checksum>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  access_methods: Vec<AccessMethod>,
  #[serde(skip_serializing_if = "Option::is_none")]
  contents: Option<Vec<ContentsObject>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  description: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  aliases: Vec<String>,
}

impl DrsObject {
  /// Create a builder for an object hosted at `host`, with the self uri derived
  /// from the host and id.
  pub fn builder(
    id: impl Into<String>,
    host: impl Into<String>,
    created_time: DateTime<Utc>,
  ) -> DrsObjectBuilder {
    DrsObjectBuilder::new(id, host, created_time)
  }

  /// Get the id.
  pub fn id(&self) -> &str {
    &self.id
  }

  /// Get the name.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// Get the self uri.
  pub fn self_uri(&self) -> &str {
    &self.self_uri
  }

  /// Get the size in bytes.
  pub fn size(&self) -> Option<u64> {
    self.size
  }

  /// Get the created time.
  pub fn created_time(&self) -> DateTime<Utc> {
    self.created_time
  }

  /// Get the updated time.
  pub fn updated_time(&self) -> Option<DateTime<Utc>> {
    self.updated_time
  }

  /// Get the version.
  pub fn version(&self) -> Option<&str> {
    self.version.as_deref()
  }

  /// Get the mime type.
  pub fn mime_type(&self) -> Option<&str> {
    self.mime_type.as_deref()
  }

  /// Get the checksums.
  pub fn checksums(&self) -> &[Checksum] {
    &self.checksums
  }

  /// Get the access methods.
  pub fn access_methods(&self) -> &[AccessMethod] {
    &self.access_methods
  }

  /// Get the contents.
  pub fn contents(&self) -> Option<&[ContentsObject]> {
    self.contents.as_deref()
  }

  /// Get the description.
  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  /// Get the aliases.
  pub fn aliases(&self) -> &[String] {
    &self.aliases
  }

  /// Is this object a bundle.
  pub fn is_bundle(&self) -> bool {
    self
      .contents
      .as_ref()
      .is_some_and(|contents| !contents.is_empty())
  }

  /// Is this object a blob.
  pub fn is_blob(&self) -> bool {
    !self.is_bundle()
  }

  pub(crate) fn take_contents(&mut self) -> Vec<ContentsObject> {
    self.contents.take().unwrap_or_default()
  }

  pub(crate) fn set_contents(&mut self, contents: Vec<ContentsObject>) {
    self.contents = Some(contents);
  }

  /// Validate the object's invariants, rejecting objects that are neither a
  /// valid blob nor a valid bundle.
  pub fn validate(&self) -> Result<()> {
    if self.id.is_empty() {
      return Err(InvalidObject("empty object id".to_string()));
    }

    if object_id_from_uri(&self.self_uri) != Some(&self.id) {
      return Err(InvalidObject(format!(
        "self_uri `{}` does not encode object id `{}`",
        self.self_uri, self.id
      )));
    }

    if self.checksums.is_empty() {
      return Err(InvalidObject(format!(
        "object `{}` has no checksums",
        self.id
      )));
    }
    for checksum in &self.checksums {
      checksum.validate()?;
    }

    for access_method in &self.access_methods {
      access_method.validate()?;
    }

    if !self.is_bundle() && self.access_methods.is_empty() {
      return Err(InvalidObject(format!(
        "object `{}` is neither a blob nor a bundle",
        self.id
      )));
    }

    if let Some(updated_time) = self.updated_time {
      if updated_time < self.created_time {
        return Err(InvalidObject(format!(
          "object `{}` has an updated_time before its created_time",
          self.id
        )));
      }
    }

    if let Some(contents) = self.contents() {
      validate_unique_names(&self.id, contents)?;
    }

    Ok(())
  }
}

/// Child names must be unique among siblings at every level of a bundle's
/// contents, including inline nested entries.
fn validate_unique_names(id: &str, contents: &[ContentsObject]) -> Result<()> {
  let mut names: Vec<&str> = contents.iter().map(|entry| entry.name()).collect();
  names.sort_unstable();
  names.dedup();
  if names.len() != contents.len() {
    return Err(InvalidObject(format!(
      "bundle `{id}` has duplicate child names"
    )));
  }

  for entry in contents {
    if let Some(nested) = entry.contents() {
      validate_unique_names(id, nested)?;
    }
  }

  Ok(())
}

/// A builder for `DrsObject` which validates the blob and bundle invariants on build.
#[derive(Clone, Debug)]
pub struct DrsObjectBuilder {
  object: DrsObject,
}

impl DrsObjectBuilder {
  /// Create a new builder.
  pub fn new(id: impl Into<String>, host: impl Into<String>, created_time: DateTime<Utc>) -> Self {
    let id = id.into();
    let self_uri = format!("{}{}/{}", DRS_URI_SCHEME, host.into(), id);

    Self {
      object: DrsObject {
        id,
        name: None,
        self_uri,
        size: None,
        created_time,
        updated_time: None,
        version: None,
        mime_type: None,
        checksums: Vec::new(),
        access_methods: Vec::new(),
        contents: None,
        description: None,
        aliases: Vec::new(),
      },
    }
  }

  /// Set the name.
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.object.name = Some(name.into());
    self
  }

  /// Set the size in bytes.
  pub fn with_size(mut self, size: u64) -> Self {
    self.object.size = Some(size);
    self
  }

  /// Set the updated time.
  pub fn with_updated_time(mut self, updated_time: DateTime<Utc>) -> Self {
    self.object.updated_time = Some(updated_time);
    self
  }

  /// Set the version.
  pub fn with_version(mut self, version: impl Into<String>) -> Self {
    self.object.version = Some(version.into());
    self
  }

  /// Set the mime type.
  pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
    self.object.mime_type = Some(mime_type.into());
    self
  }

  /// Add a checksum.
  pub fn with_checksum(mut self, checksum: Checksum) -> Self {
    self.object.checksums.push(checksum);
    self
  }

  /// Add an access method.
  pub fn with_access_method(mut self, access_method: AccessMethod) -> Self {
    self.object.access_methods.push(access_method);
    self
  }

  /// Set the contents, making the object a bundle.
  pub fn with_contents(mut self, contents: Vec<ContentsObject>) -> Self {
    self.object.contents = Some(contents);
    self
  }

  /// Set the description.
  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.object.description = Some(description.into());
    self
  }

  /// Add an alias.
  pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
    self.object.aliases.push(alias.into());
    self
  }

  /// Validate and build the object.
  pub fn build(self) -> Result<DrsObject> {
    self.object.validate()?;
    Ok(self.object)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::error::Error;
  use serde_json::json;

  pub(crate) const TEST_HOST: &str = "drs.example.org";
  pub(crate) const TEST_DIGEST: &str =
    "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae";

  pub(crate) fn test_created_time() -> DateTime<Utc> {
    "2022-02-04T05:28:01.648Z"
      .parse()
      .expect("expected valid timestamp")
  }

  pub(crate) fn test_checksum() -> Checksum {
    Checksum::new(ChecksumAlgorithm::Sha256, TEST_DIGEST)
  }

  fn test_blob(id: &str) -> DrsObject {
    DrsObject::builder(id, TEST_HOST, test_created_time())
      .with_checksum(test_checksum())
      .with_access_method(
        AccessMethod::new(AccessMethodType::Https)
          .with_access_url(AccessUrl::new(format!("https://example.com/data/{id}"))),
      )
      .build()
      .expect("expected valid blob")
  }

  #[test]
  fn object_id_round_trips_through_self_uri() {
    let blob = test_blob("some/nested/id");

    assert_eq!(blob.self_uri(), "drs://drs.example.org/some/nested/id");
    assert_eq!(object_id_from_uri(blob.self_uri()), Some("some/nested/id"));
  }

  #[test]
  fn object_id_from_uri_rejects_other_schemes() {
    assert_eq!(object_id_from_uri("https://example.com/id"), None);
    assert_eq!(object_id_from_uri("drs://hostonly"), None);
    assert_eq!(object_id_from_uri("drs://host/"), None);
  }

  #[test]
  fn blob_classification() {
    let blob = test_blob("blob");

    assert!(blob.is_blob());
    assert!(!blob.is_bundle());
  }

  #[test]
  fn bundle_classification() {
    let bundle = DrsObject::builder("bundle", TEST_HOST, test_created_time())
      .with_checksum(test_checksum())
      .with_contents(vec![ContentsObject::new("child").with_id("child")])
      .build()
      .unwrap();

    assert!(bundle.is_bundle());
    assert!(!bundle.is_blob());
  }

  #[test]
  fn neither_blob_nor_bundle_is_rejected() {
    let result = DrsObject::builder("degenerate", TEST_HOST, test_created_time())
      .with_checksum(test_checksum())
      .build();

    assert!(matches!(result, Err(Error::InvalidObject(_))));
  }

  #[test]
  fn empty_checksums_are_rejected() {
    let result = DrsObject::builder("blob", TEST_HOST, test_created_time())
      .with_access_method(
        AccessMethod::new(AccessMethodType::Https)
          .with_access_url(AccessUrl::new("https://example.com/data/blob")),
      )
      .build();

    assert!(matches!(result, Err(Error::InvalidObject(_))));
  }

  #[test]
  fn wrong_digest_length_is_rejected() {
    let result = DrsObject::builder("blob", TEST_HOST, test_created_time())
      .with_checksum(Checksum::new(ChecksumAlgorithm::Sha256, "abc123"))
      .with_access_method(
        AccessMethod::new(AccessMethodType::Https)
          .with_access_url(AccessUrl::new("https://example.com/data/blob")),
      )
      .build();

    assert!(matches!(result, Err(Error::InvalidObject(_))));
  }

  #[test]
  fn non_hex_digest_length_is_not_checked() {
    let checksum = Checksum::new(ChecksumAlgorithm::Etag, "W/\"etag-value\"");
    assert!(checksum.validate().is_ok());
  }

  #[test]
  fn access_method_without_url_or_id_is_rejected() {
    let result = DrsObject::builder("blob", TEST_HOST, test_created_time())
      .with_checksum(test_checksum())
      .with_access_method(AccessMethod::new(AccessMethodType::S3))
      .build();

    assert!(matches!(result, Err(Error::InvalidObject(_))));
  }

  #[test]
  fn duplicate_child_names_are_rejected() {
    let result = DrsObject::builder("bundle", TEST_HOST, test_created_time())
      .with_checksum(test_checksum())
      .with_contents(vec![
        ContentsObject::new("child").with_id("a"),
        ContentsObject::new("child").with_id("b"),
      ])
      .build();

    assert!(matches!(result, Err(Error::InvalidObject(_))));
  }

  #[test]
  fn duplicate_nested_child_names_are_rejected() {
    let result = DrsObject::builder("bundle", TEST_HOST, test_created_time())
      .with_checksum(test_checksum())
      .with_contents(vec![ContentsObject::new("child").with_contents(vec![
        ContentsObject::new("grandchild").with_id("a"),
        ContentsObject::new("grandchild").with_id("b"),
      ])])
      .build();

    assert!(matches!(result, Err(Error::InvalidObject(_))));
  }

  #[test]
  fn updated_before_created_is_rejected() {
    let result = DrsObject::builder("blob", TEST_HOST, test_created_time())
      .with_checksum(test_checksum())
      .with_access_method(
        AccessMethod::new(AccessMethodType::Https)
          .with_access_url(AccessUrl::new("https://example.com/data/blob")),
      )
      .with_updated_time("2021-01-01T00:00:00Z".parse().unwrap())
      .build();

    assert!(matches!(result, Err(Error::InvalidObject(_))));
  }

  #[test]
  fn unset_fields_are_omitted_from_the_wire() {
    let blob = test_blob("blob");
    let value = serde_json::to_value(&blob).unwrap();
    let object = value.as_object().unwrap();

    assert!(!object.contains_key("name"));
    assert!(!object.contains_key("size"));
    assert!(!object.contains_key("contents"));
    assert!(!object.contains_key("aliases"));
    assert_eq!(object.get("id"), Some(&json!("blob")));
    assert_eq!(
      object.get("checksums"),
      Some(&json!([{ "checksum": TEST_DIGEST, "type": "sha-256" }]))
    );
  }

  #[test]
  fn objects_deserialize_from_the_wire() {
    let object: DrsObject = serde_json::from_value(json!({
      "id": "blob",
      "self_uri": "drs://drs.example.org/blob",
      "created_time": "2022-02-04T05:28:01.648Z",
      "checksums": [{ "checksum": TEST_DIGEST, "type": "sha-256" }],
      "access_methods": [{
        "type": "s3",
        "access_id": "signed-s3",
        "region": "us-east-1"
      }]
    }))
    .unwrap();

    assert!(object.validate().is_ok());
    assert_eq!(object.access_methods()[0].access_id(), Some("signed-s3"));
    assert_eq!(
      object.access_methods()[0].method_type(),
      AccessMethodType::S3
    );
  }
}
