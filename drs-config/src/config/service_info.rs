//! Service info configuration.
//!

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Service info config. Holds the static fields returned from the service-info
/// endpoint, except the `type` block which the server controls. The default
/// seeds an `id`, `name` and `description` so an unconfigured server still
/// returns a complete response.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ServiceInfo(HashMap<String, Value>);

impl Default for ServiceInfo {
  fn default() -> Self {
    Self(HashMap::from_iter(vec![
      ("id".to_string(), Value::from("org.ga4gh.drs-rs")),
      ("name".to_string(), Value::from("drs-rs")),
      (
        "description".to_string(),
        Value::from("Serves data according to the DRS specification."),
      ),
    ]))
  }
}

impl ServiceInfo {
  /// Create a service info.
  pub fn new(fields: HashMap<String, Value>) -> Self {
    Self(fields)
  }

  /// Get the inner value.
  pub fn into_inner(self) -> HashMap<String, Value> {
    self.0
  }
}

impl AsRef<HashMap<String, Value>> for ServiceInfo {
  fn as_ref(&self) -> &HashMap<String, Value> {
    &self.0
  }
}

impl<'de> Deserialize<'de> for ServiceInfo {
  fn deserialize<D>(deserializer: D) -> Result<ServiceInfo, D::Error>
  where
    D: Deserializer<'de>,
  {
    let fields: HashMap<String, Value> = HashMap::<String, Value>::deserialize(deserializer)?
      .into_iter()
      .map(|(key, value)| (key.to_lowercase(), value))
      .collect();

    if fields.contains_key("type") {
      return Err(Error::custom("reserved service info field `type`"));
    }

    Ok(ServiceInfo::new(fields))
  }
}
