//! Configuration for drs-rs, sourced from a TOML file and environment variables.
//!

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args as ClapArgs, Command, FromArgMatches, Parser};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::subscriber::set_global_default;
use tracing_subscriber::fmt::{format, layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::service_info::ServiceInfo;
use crate::config::FormattingStyle::{Compact, Full, Json, Pretty};
use crate::error::Error::{ArgParseError, IoError, TracingError};
use crate::error::Result;

pub mod service_info;

/// Represents a usage string for drs-rs.
pub const USAGE: &str = "To configure drs-rs use a config file or environment variables. \
See the documentation of the drs-config crate for more information.";

const ENVIRONMENT_VARIABLE_PREFIX: &str = "DRS_";

fn default_addr() -> &'static str {
  "127.0.0.1:8080"
}

const DEFAULT_SIGNER_TIMEOUT_MS: u64 = 5000;

/// The command line arguments allowed for the drs-rs executables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = USAGE)]
struct Args {
  #[arg(
    short,
    long,
    env = "DRS_CONFIG",
    help = "Set the location of the config file"
  )]
  config: Option<PathBuf>,
  #[arg(short, long, exclusive = true, help = "Print a default config file")]
  print_default_config: bool,
}

/// Determines which tracing formatting style to use.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default)]
pub enum FormattingStyle {
  #[default]
  Full,
  Compact,
  Pretty,
  Json,
}

/// Configuration for the drs server.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
  formatting_style: FormattingStyle,
  addr: SocketAddr,
  objects_path: Option<PathBuf>,
  signer_timeout_ms: u64,
  service_info: ServiceInfo,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      formatting_style: Full,
      addr: default_addr().parse().expect("expected valid address"),
      objects_path: None,
      signer_timeout_ms: DEFAULT_SIGNER_TIMEOUT_MS,
      service_info: ServiceInfo::default(),
    }
  }
}

impl Config {
  /// Create a new config.
  pub fn new(
    formatting_style: FormattingStyle,
    addr: SocketAddr,
    objects_path: Option<PathBuf>,
    signer_timeout_ms: u64,
    service_info: ServiceInfo,
  ) -> Self {
    Self {
      formatting_style,
      addr,
      objects_path,
      signer_timeout_ms,
      service_info,
    }
  }

  /// Parse the command line arguments, augmenting the `Command` args from the `clap` parser.
  /// Returns the config path, or prints the default config.
  pub fn parse_args_with_command(augment_args: Command) -> Result<Option<PathBuf>> {
    Ok(Self::parse_with_args(
      Args::from_arg_matches(&Args::augment_args(augment_args).get_matches())
        .map_err(|err| ArgParseError(err.to_string()))?,
    ))
  }

  /// Parse the command line arguments. Returns the config path, or prints the default config.
  pub fn parse_args() -> Option<PathBuf> {
    Self::parse_with_args(Args::parse())
  }

  fn parse_with_args(args: Args) -> Option<PathBuf> {
    if args.print_default_config {
      println!(
        "{}",
        toml::ser::to_string_pretty(&Config::default()).expect("expected valid default config")
      );
      None
    } else {
      Some(args.config.unwrap_or_else(|| "".into()))
    }
  }

  /// Read a config struct from a TOML file, merging in any `DRS_`-prefixed environment variables.
  pub fn from_path(path: &Path) -> Result<Self> {
    Figment::from(Serialized::defaults(Config::default()))
      .merge(Toml::file(path))
      .merge(Env::prefixed(ENVIRONMENT_VARIABLE_PREFIX))
      .extract()
      .map_err(|err| IoError(err.to_string()))
  }

  /// Setup tracing, using a global subscriber.
  pub fn setup_tracing(&self) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = Registry::default().with(env_filter);

    match self.formatting_style() {
      Full => set_global_default(subscriber.with(layer())),
      Compact => set_global_default(subscriber.with(layer().event_format(format().compact()))),
      Pretty => set_global_default(subscriber.with(layer().event_format(format().pretty()))),
      Json => set_global_default(subscriber.with(layer().event_format(format().json()))),
    }
    .map_err(|err| TracingError(err.to_string()))?;

    Ok(())
  }

  /// Get the formatting style.
  pub fn formatting_style(&self) -> FormattingStyle {
    self.formatting_style
  }

  /// Get the address the server should bind to.
  pub fn addr(&self) -> SocketAddr {
    self.addr
  }

  /// Get the path of the objects file backing the registry, if one is configured.
  pub fn objects_path(&self) -> Option<&Path> {
    self.objects_path.as_deref()
  }

  /// Get the timeout applied to url signing calls.
  pub fn signer_timeout(&self) -> Duration {
    Duration::from_millis(self.signer_timeout_ms)
  }

  /// Get service info.
  pub fn service_info(&self) -> &ServiceInfo {
    &self.service_info
  }
}
