use crate::application::config::models::{Config, HandlerKind};
use crate::application::config::parser::parse_config_file;
use crate::application::config::validator::validate_config;
use crate::common::error::Result;
use clap::{Parser, ValueEnum};
use std::net::IpAddr;

/// Command-line flags. Anything given here overrides the config file, which
/// in turn overrides the built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "poolhttpd")]
#[command(about = "Fixed worker-pool TCP server")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Port to listen on [default: 5000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of backlog connections [default: 5]
    #[arg(short, long)]
    pub backlog: Option<u32>,

    /// Number of execution threads [default: 10]
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Request handler to serve with [default: not-found]
    #[arg(long, value_enum)]
    pub handler: Option<HandlerArg>,

    /// Per-connection read timeout in milliseconds, 0 disables it
    #[arg(long)]
    pub read_timeout_ms: Option<u64>,

    /// Log filter, e.g. "info" or "poolhttpd=debug" [default: info]
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HandlerArg {
    NotFound,
    Echo,
}

impl From<HandlerArg> for HandlerKind {
    fn from(arg: HandlerArg) -> Self {
        match arg {
            HandlerArg::NotFound => HandlerKind::NotFound,
            HandlerArg::Echo => HandlerKind::Echo,
        }
    }
}

impl Cli {
    /// Build the final validated configuration. The file is only parsed
    /// here; validation runs once, after the flags are applied.
    pub fn resolve(&self) -> Result<Config> {
        let base = match &self.config {
            Some(path) => parse_config_file(path)?,
            None => Config::default(),
        };

        let config = self.apply(base);
        validate_config(&config)?;
        Ok(config)
    }

    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(backlog) = self.backlog {
            config.backlog = backlog;
        }
        if let Some(threads) = self.threads {
            config.thread_count = threads;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(handler) = self.handler {
            config.handler = handler.into();
        }
        if let Some(ms) = self.read_timeout_ms {
            config.read_timeout_ms = ms;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }
}
