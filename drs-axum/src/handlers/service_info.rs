use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::response::ErasedJson;

use drs_http::get_service_info_json;
use drs_registry::ObjectRegistry;

use crate::server::AppState;

/// Gets the JSON to return for the service-info endpoint.
pub async fn service_info<R: ObjectRegistry + Clone + 'static>(
  State(app_state): State<AppState<R>>,
) -> impl IntoResponse {
  ErasedJson::pretty(get_service_info_json(&app_state.service_info))
}
