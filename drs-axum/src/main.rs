use tracing::debug;

use drs_axum::server::BindServer;
use drs_config::command;
use drs_config::config::Config;
use drs_registry::InMemoryRegistry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
  if let Some(path) =
    Config::parse_args_with_command(command!()).expect("expected valid command parsing")
  {
    let config = Config::from_path(&path)?;

    config.setup_tracing()?;

    debug!(config = ?config, "config parsed");

    let registry = match config.objects_path() {
      Some(objects_path) => InMemoryRegistry::from_path(objects_path)?,
      None => InMemoryRegistry::example(),
    }
    .with_signer_timeout(config.signer_timeout());

    let service_info = config.service_info().clone();

    Ok(
      BindServer::new(config.addr())
        .bind_drs_server(registry, service_info)
        .await?
        .serve()
        .await?,
    )
  } else {
    Ok(())
  }
}
