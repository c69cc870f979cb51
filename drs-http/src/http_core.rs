use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing::instrument;

use drs_registry::{AccessUrl, DrsObject, ObjectRegistry};

use crate::passports::Passports;
use crate::Result;

/// Query parameters accepted by the objects endpoint.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ObjectQuery {
  pub expand: bool,
}

/// Gets a JSON response for a GET request against the objects endpoint,
/// expanding bundle contents recursively when `expand` is true. Expansion on
/// a blob is a no-op.
#[instrument(level = "debug", skip(registry), ret)]
pub async fn get_object(
  registry: impl ObjectRegistry + 'static,
  object_id: &str,
  expand: bool,
) -> Result<DrsObject> {
  debug!(object_id, expand, "getting GET response");

  let object = registry.get(object_id).await?;
  Ok(registry.expand(object, expand).await?)
}

/// Gets a JSON response for a POST request against the objects endpoint. The
/// submitted passports are structurally checked before any object is
/// disclosed, and the expand flag is taken from the body.
#[instrument(level = "debug", skip(registry, body), ret)]
pub async fn post_object(
  registry: impl ObjectRegistry + 'static,
  object_id: &str,
  body: Passports,
) -> Result<DrsObject> {
  debug!(object_id, passports = body.passports.len(), "getting POST response");

  body.validate()?;
  get_object(registry, object_id, body.expand).await
}

/// Gets a JSON response for a GET request against the access endpoint,
/// producing a url that can be used to fetch the bytes of a blob.
#[instrument(level = "debug", skip(registry), ret)]
pub async fn get_access_url(
  registry: impl ObjectRegistry + 'static,
  object_id: &str,
  access_id: &str,
) -> Result<AccessUrl> {
  debug!(object_id, access_id, "getting GET response");

  Ok(registry.resolve_access(object_id, access_id).await?)
}

/// Gets a JSON response for a POST request against the access endpoint,
/// checking the submitted passports first.
#[instrument(level = "debug", skip(registry, body), ret)]
pub async fn post_access_url(
  registry: impl ObjectRegistry + 'static,
  object_id: &str,
  access_id: &str,
  body: Passports,
) -> Result<AccessUrl> {
  body.validate()?;
  get_access_url(registry, object_id, access_id).await
}
