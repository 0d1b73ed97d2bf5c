use crate::common::constants::{
    DEFAULT_BACKLOG, DEFAULT_LOG_LEVEL, DEFAULT_PORT, DEFAULT_READ_TIMEOUT_MS, DEFAULT_THREAD_COUNT,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Startup configuration as read from a TOML file and the command line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Address to bind; the wildcard address by default
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Pending-connection queue length handed to listen(2)
    #[serde(default = "default_backlog")]
    pub backlog: u32,

    /// Number of accept workers
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,

    /// Per-connection read timeout in milliseconds, 0 disables it
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default)]
    pub handler: HandlerKind,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_backlog() -> u32 {
    DEFAULT_BACKLOG
}

fn default_thread_count() -> usize {
    DEFAULT_THREAD_COUNT
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            backlog: default_backlog(),
            thread_count: default_thread_count(),
            read_timeout_ms: default_read_timeout_ms(),
            handler: HandlerKind::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// The immutable settings one `Server` run is built from
    pub fn server_config(&self) -> ServerConfig {
        let read_timeout = match self.read_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        ServerConfig {
            bind_address: ListenAddress::new(self.host, self.port),
            backlog: self.backlog,
            thread_count: self.thread_count,
            read_timeout,
        }
    }
}

/// Which stock request handler the binary serves with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    /// Answers every request with a 404, handling nothing
    #[default]
    NotFound,
    /// Sends the request bytes straight back
    Echo,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::NotFound => "not_found",
            HandlerKind::Echo => "echo",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host (or wildcard) and port a listener binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenAddress {
    host: IpAddr,
    port: u16,
}

impl ListenAddress {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self { host, port }
    }

    /// Loopback with an ephemeral port
    pub fn localhost(port: u16) -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

/// Settings for one `Server` run. Changing them means starting a new server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: ListenAddress,
    pub backlog: u32,
    pub thread_count: usize,
    pub read_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn new(bind_address: ListenAddress, backlog: u32, thread_count: usize) -> Self {
        Self {
            bind_address,
            backlog,
            thread_count,
            read_timeout: Some(Duration::from_millis(DEFAULT_READ_TIMEOUT_MS)),
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}
