use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum_extra::extract::Form;

use drs_http::{post_access_url, post_object, Passports};
use drs_registry::ObjectRegistry;

use crate::server::AppState;

use super::handle_response;

/// POST request objects endpoint, accepting a form-encoded set of passports.
pub async fn object<R: ObjectRegistry + Clone + 'static>(
  Path(object_id): Path<String>,
  State(app_state): State<AppState<R>>,
  Form(body): Form<Passports>,
) -> impl IntoResponse {
  handle_response(post_object(app_state.registry, &object_id, body).await)
}

/// POST request access url endpoint, accepting a form-encoded set of passports.
pub async fn access_url<R: ObjectRegistry + Clone + 'static>(
  Path((object_id, access_id)): Path<(String, String)>,
  State(app_state): State<AppState<R>>,
  Form(body): Form<Passports>,
) -> impl IntoResponse {
  handle_response(post_access_url(app_state.registry, &object_id, &access_id, body).await)
}
