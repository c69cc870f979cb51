//! Transport-agnostic request handling for the DRS read endpoints. The axum
//! server calls into this crate, which in turn drives the object registry.
//!

pub use error::{DrsError, JsonDrsError, Result};
pub use http_core::{get_access_url, get_object, post_access_url, post_object, ObjectQuery};
pub use passports::Passports;
pub use service_info::{get_service_info_json, ServiceInfo, Type};

mod error;
mod http_core;
mod passports;
mod service_info;
