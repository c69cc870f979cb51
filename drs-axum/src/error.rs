//! This module contains error and result types for drs-axum.
//!

use axum::response::{IntoResponse, Response};
use axum_extra::response::ErasedJson;
use std::{io, result};
use thiserror::Error;

/// The result type for drs-axum.
pub type Result<T> = result::Result<T, Error>;

/// The error type for drs-axum.
#[derive(Error, Debug)]
pub enum Error {
  #[error("{0}")]
  IoError(#[from] io::Error),

  #[error("server error: {0}")]
  ServerError(String),
}

impl From<Error> for io::Error {
  fn from(error: Error) -> Self {
    if let Error::IoError(io) = error {
      io
    } else {
      io::Error::other(error)
    }
  }
}

/// A wrapper around the http DrsError for implementing Axum response traits.
#[derive(Debug)]
pub struct DrsError(pub drs_http::DrsError);

impl IntoResponse for DrsError {
  fn into_response(self) -> Response {
    let (json, status_code) = self.0.to_json_representation();
    (status_code, ErasedJson::pretty(json)).into_response()
  }
}

impl From<drs_http::DrsError> for DrsError {
  fn from(err: drs_http::DrsError) -> Self {
    Self(err)
  }
}
