//! Module providing a representation of the DRS object model and registry.
//!
//! Based on the [DRS specification](https://ga4gh.github.io/data-repository-service-schemas/).
//!

pub use error::{Error, Result};
pub use object::{
  object_id_from_uri, AccessMethod, AccessMethodType, AccessUrl, Checksum, ChecksumAlgorithm,
  ContentsObject, DrsObject, DrsObjectBuilder,
};
pub use registry::{InMemoryRegistry, ObjectRegistry};
pub use signer::{StaticSigner, UrlSigner};

pub mod error;
pub mod object;
pub mod registry;
pub mod signer;
