use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;
use tracing::instrument;

use drs_config::config::service_info::ServiceInfo as ConfigServiceInfo;

const DRS_GROUP: &str = "org.ga4gh";
const DRS_ARTIFACT: &str = "drs";
const DRS_VERSION: &str = "1.2.0";

/// A struct representing the information that should be present in a
/// service-info response. The service-info type registry maintained by the
/// Technical Alignment Sub Committee requires a DRS service to have a
/// `type.group` of `org.ga4gh` and a `type.artifact` of `drs`.
#[derive(Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct ServiceInfo {
  #[serde(flatten)]
  pub fields: HashMap<String, Value>,
  #[serde(rename = "type")]
  pub service_type: Type,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
  pub group: String,
  pub artifact: String,
  pub version: String,
}

impl Default for Type {
  fn default() -> Self {
    Self {
      group: DRS_GROUP.to_string(),
      artifact: DRS_ARTIFACT.to_string(),
      version: DRS_VERSION.to_string(),
    }
  }
}

/// Assemble the service-info response from the static configuration loaded at
/// startup, with the type block always controlled by the server.
#[instrument(level = "debug", skip_all)]
pub fn get_service_info_json(config: &ConfigServiceInfo) -> ServiceInfo {
  debug!("getting service-info response");

  ServiceInfo {
    fields: config.as_ref().clone(),
    service_type: Default::default(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn service_info_type_block() {
    let service_info = get_service_info_json(&ConfigServiceInfo::default());
    let value = serde_json::to_value(&service_info).unwrap();

    assert_eq!(
      value.get("type"),
      Some(&json!({
        "group": "org.ga4gh",
        "artifact": "drs",
        "version": "1.2.0"
      }))
    );
  }

  #[test]
  fn config_fields_are_merged_into_the_response() {
    let config = ConfigServiceInfo::new(HashMap::from_iter(vec![
      ("id".to_string(), json!("org.example.drs")),
      (
        "description".to_string(),
        json!("Serves data according to DRS specification"),
      ),
    ]));

    let value = serde_json::to_value(get_service_info_json(&config)).unwrap();

    assert_eq!(value.get("id"), Some(&json!("org.example.drs")));
    assert_eq!(
      value.get("description"),
      Some(&json!("Serves data according to DRS specification"))
    );
  }
}
