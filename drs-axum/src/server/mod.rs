//! The Axum DRS server.
//!

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use http::{StatusCode, Uri};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use drs_config::config::service_info::ServiceInfo;
use drs_registry::ObjectRegistry;

use crate::error::Error::ServerError;
use crate::error::Result;
use crate::handlers;

/// Represents the axum app state.
#[derive(Debug, Clone)]
pub struct AppState<R> {
  pub(crate) registry: R,
  pub(crate) service_info: ServiceInfo,
}

impl<R> AppState<R> {
  /// Create a new app state.
  pub fn new(registry: R, service_info: ServiceInfo) -> Self {
    Self {
      registry,
      service_info,
    }
  }
}

/// An axum server which should bind an address.
#[derive(Debug, Clone)]
pub struct BindServer {
  addr: SocketAddr,
}

impl BindServer {
  /// Create a new bind server.
  pub fn new(addr: SocketAddr) -> Self {
    Self { addr }
  }

  /// Eagerly bind the address by returning a `Server`. This function also
  /// updates the address to the actual bound address.
  pub async fn bind_server(&mut self) -> Result<Server> {
    let server = Server::bind_addr(self.addr).await?;
    self.addr = server.local_addr()?;

    Ok(server)
  }

  /// Eagerly bind the address by returning a `DrsServer`.
  pub async fn bind_drs_server<R>(
    &mut self,
    registry: R,
    service_info: ServiceInfo,
  ) -> Result<DrsServer<R>>
  where
    R: ObjectRegistry + Clone + 'static,
  {
    let server = self.bind_server().await?;

    Ok(DrsServer::new(server, registry, service_info))
  }

  /// Get the [SocketAddr] of this server.
  pub fn get_addr(&self) -> SocketAddr {
    self.addr
  }
}

/// An Axum server bound to an address.
#[derive(Debug)]
pub struct Server {
  listener: TcpListener,
}

impl Server {
  /// Eagerly bind the address for use with the server, returning any errors.
  pub async fn bind_addr(addr: SocketAddr) -> Result<Server> {
    let listener = TcpListener::bind(addr).await?;

    Ok(Self { listener })
  }

  /// Run the actual server, using the router.
  pub async fn serve(self, app: Router) -> Result<()> {
    axum::serve(self.listener, app)
      .await
      .map_err(|err| ServerError(err.to_string()))
  }

  /// Get the local address the server has bound to.
  pub fn local_addr(&self) -> Result<SocketAddr> {
    Ok(self.listener.local_addr()?)
  }
}

/// The DRS server, serving the read routes of the DRS specification.
#[derive(Debug)]
pub struct DrsServer<R> {
  server: Server,
  registry: R,
  service_info: ServiceInfo,
}

impl<R> DrsServer<R>
where
  R: ObjectRegistry + Clone + 'static,
{
  /// Create a new DRS server.
  pub fn new(server: Server, registry: R, service_info: ServiceInfo) -> Self {
    Self {
      server,
      registry,
      service_info,
    }
  }

  /// Run the DRS server.
  pub async fn serve(self) -> Result<()> {
    info!(address = ?self.server.local_addr()?, "drs server address bound to");

    let router = Self::router(self.registry, self.service_info);
    self.server.serve(router).await
  }

  /// Create the router for the DRS server.
  pub fn router(registry: R, service_info: ServiceInfo) -> Router {
    Router::default()
      .route("/service-info", get(handlers::service_info::service_info::<R>))
      .route(
        "/objects/{object_id}",
        get(handlers::get::object::<R>).post(handlers::post::object::<R>),
      )
      .route(
        "/objects/{object_id}/access/{access_id}",
        get(handlers::get::access_url::<R>).post(handlers::post::access_url::<R>),
      )
      .fallback(Self::fallback)
      .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
      .with_state(AppState::new(registry, service_info))
  }

  /// Get the local address the server has bound to.
  pub fn local_addr(&self) -> Result<SocketAddr> {
    self.server.local_addr()
  }

  /// A handler for when a route is not found.
  async fn fallback(uri: Uri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("No route for {uri}"))
  }
}
