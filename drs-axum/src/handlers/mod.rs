use axum::response::{IntoResponse, Response};
use axum_extra::response::ErasedJson;
use http::StatusCode;
use serde::Serialize;

use crate::error::DrsError;

pub mod get;
pub mod post;
pub mod service_info;

/// Handles a response, converting errors to json and using the proper HTTP status code.
fn handle_response<T: Serialize>(response: drs_http::Result<T>) -> Response {
  match response {
    Err(error) => DrsError(error).into_response(),
    Ok(json) => (StatusCode::OK, ErasedJson::pretty(json)).into_response(),
  }
}
