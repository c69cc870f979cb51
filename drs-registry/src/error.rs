//! Error types used by this crate.
//!

use std::{io, result};

use thiserror::Error;

/// The result type returning a registry `Error`.
pub type Result<T> = result::Result<T, Error>;

/// The error type for registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("cyclic bundle: {0}")]
  CyclicBundle(String),

  #[error("invalid object: {0}")]
  InvalidObject(String),

  #[error("upstream timeout: {0}")]
  UpstreamTimeout(String),

  #[error("io error: {0}")]
  IoError(String),

  #[error("parse error: {0}")]
  ParseError(String),

  #[error("internal error: {0}")]
  InternalError(String),
}

impl Error {
  pub fn not_found<S: Into<String>>(message: S) -> Self {
    Self::NotFound(message.into())
  }

  pub fn cyclic_bundle<S: Into<String>>(message: S) -> Self {
    Self::CyclicBundle(message.into())
  }

  pub fn invalid_object<S: Into<String>>(message: S) -> Self {
    Self::InvalidObject(message.into())
  }

  pub fn upstream_timeout<S: Into<String>>(message: S) -> Self {
    Self::UpstreamTimeout(message.into())
  }

  pub fn internal_error<S: Into<String>>(message: S) -> Self {
    Self::InternalError(message.into())
  }
}

impl From<Error> for io::Error {
  fn from(error: Error) -> Self {
    io::Error::other(error.to_string())
  }
}

impl From<io::Error> for Error {
  fn from(error: io::Error) -> Self {
    Error::IoError(error.to_string())
  }
}

impl From<serde_json::Error> for Error {
  fn from(err: serde_json::Error) -> Self {
    Error::ParseError(err.to_string())
  }
}
