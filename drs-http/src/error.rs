use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use drs_registry::Error as RegistryError;

pub type Result<T> = core::result::Result<T, DrsError>;

/// An error type covering the error responses described in the
/// [DRS specification](https://ga4gh.github.io/data-repository-service-schemas/).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DrsError {
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  InvalidPassport(String),
  #[error("{0}")]
  PermissionDenied(String),
  #[error("{0}")]
  InvalidInput(String),
  #[error("{0}")]
  UpstreamTimeout(String),
  #[error("{0}")]
  InternalError(String),
}

/// A helper struct implementing [serde's Serialize trait](Serialize) matching
/// the DRS error schema, for converting errors to JSON response bodies.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct JsonDrsError {
  status_code: u16,
  msg: String,
}

impl DrsError {
  /// Allows converting the error to JSON and the correspondent status code.
  pub fn to_json_representation(&self) -> (JsonDrsError, StatusCode) {
    let (err, status_code) = match self {
      DrsError::NotFound(err) => (err, StatusCode::NOT_FOUND),
      DrsError::InvalidPassport(err) => (err, StatusCode::UNAUTHORIZED),
      DrsError::PermissionDenied(err) => (err, StatusCode::FORBIDDEN),
      DrsError::InvalidInput(err) => (err, StatusCode::BAD_REQUEST),
      DrsError::UpstreamTimeout(err) => (err, StatusCode::GATEWAY_TIMEOUT),
      DrsError::InternalError(err) => (err, StatusCode::INTERNAL_SERVER_ERROR),
    };

    (
      JsonDrsError {
        status_code: status_code.as_u16(),
        msg: err.to_string(),
      },
      status_code,
    )
  }
}

impl From<RegistryError> for DrsError {
  fn from(error: RegistryError) -> Self {
    match error {
      RegistryError::NotFound(err) => Self::NotFound(err),
      RegistryError::UpstreamTimeout(err) => Self::UpstreamTimeout(err),
      RegistryError::CyclicBundle(err) => {
        error!(error = %err, "data integrity violation in the backing store");
        Self::InternalError(err)
      }
      RegistryError::InvalidObject(err)
      | RegistryError::IoError(err)
      | RegistryError::ParseError(err)
      | RegistryError::InternalError(err) => {
        error!(error = %err, "internal error resolving request");
        Self::InternalError(err)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn status_of(error: DrsError) -> StatusCode {
    error.to_json_representation().1
  }

  #[test]
  fn error_status_codes() {
    assert_eq!(
      status_of(DrsError::NotFound("".to_string())),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      status_of(DrsError::InvalidPassport("".to_string())),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      status_of(DrsError::PermissionDenied("".to_string())),
      StatusCode::FORBIDDEN
    );
    assert_eq!(
      status_of(DrsError::InvalidInput("".to_string())),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      status_of(DrsError::UpstreamTimeout("".to_string())),
      StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
      status_of(DrsError::InternalError("".to_string())),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn json_body_contains_the_status_code() {
    let (json, _) = DrsError::NotFound("no object found".to_string()).to_json_representation();

    assert_eq!(
      serde_json::to_value(&json).unwrap(),
      serde_json::json!({ "status_code": 404, "msg": "no object found" })
    );
  }

  #[test]
  fn cyclic_bundles_map_to_internal_errors() {
    let error: DrsError = RegistryError::CyclicBundle("cycle".to_string()).into();

    assert_eq!(status_of(error), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn registry_not_found_maps_to_not_found() {
    let error: DrsError = RegistryError::NotFound("missing".to_string()).into();

    assert!(matches!(error, DrsError::NotFound(_)));
  }
}
