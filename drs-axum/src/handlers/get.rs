use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;

use drs_http::{get_access_url, get_object, ObjectQuery};
use drs_registry::ObjectRegistry;

use crate::server::AppState;

use super::handle_response;

/// GET request objects endpoint.
pub async fn object<R: ObjectRegistry + Clone + 'static>(
  Path(object_id): Path<String>,
  Query(query): Query<ObjectQuery>,
  State(app_state): State<AppState<R>>,
) -> impl IntoResponse {
  handle_response(get_object(app_state.registry, &object_id, query.expand).await)
}

/// GET request access url endpoint.
pub async fn access_url<R: ObjectRegistry + Clone + 'static>(
  Path((object_id, access_id)): Path<(String, String)>,
  State(app_state): State<AppState<R>>,
) -> impl IntoResponse {
  handle_response(get_access_url(app_state.registry, &object_id, &access_id).await)
}
