use crate::application::config::models::ServerConfig;
use crate::application::config::validator::validate_server_config;
use crate::application::handler::RequestHandler;
use crate::application::server::listener::Listener;
use crate::application::server::stats::{PoolStats, StatsSnapshot};
use crate::application::server::worker_pool::{WorkerPool, WorkerSettings, WorkerState};
use crate::common::error::Result;
use std::net::SocketAddr;
use std::sync::{Arc, Weak};

/// Listener plus worker pool plus handler, with startup and shutdown
/// sequencing.
///
/// ```ignore
/// let config = ServerConfig::new(ListenAddress::localhost(0), 5, 4);
/// let mut server = Server::start(&config, Arc::new(EchoHandler))?;
/// // ...
/// server.shutdown()?;
/// ```
pub struct Server {
    config: ServerConfig,
    local_addr: SocketAddr,
    /// Dropped after the workers are joined, which releases the socket.
    listener: Option<Arc<Listener>>,
    pool: Option<WorkerPool>,
    stats: Arc<PoolStats>,
}

impl Server {
    /// Bind the listener and spawn exactly `thread_count` workers.
    pub fn start(config: &ServerConfig, handler: Arc<dyn RequestHandler>) -> Result<Self> {
        validate_server_config(config)?;

        let listener = Arc::new(Listener::bind(config.bind_address, config.backlog)?);
        let local_addr = listener.local_addr();
        let stats = Arc::new(PoolStats::new());

        let settings = WorkerSettings {
            read_timeout: config.read_timeout,
        };
        let pool = WorkerPool::spawn(
            config.thread_count,
            Arc::clone(&listener),
            handler,
            Arc::clone(&stats),
            settings,
        )?;

        tracing::info!(
            address = %local_addr,
            workers = config.thread_count,
            "Server started"
        );

        Ok(Self {
            config: config.clone(),
            local_addr,
            listener: Some(listener),
            pool: Some(pool),
            stats,
        })
    }

    /// Stop accepting, let in-flight connections finish, join every worker
    /// and release the listening socket. Only the first call does anything.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(listener) = &self.listener {
            if self.pool.is_some() {
                tracing::info!(address = %self.local_addr, "Shutting down");
            }
            listener.close();
        }
        self.wait()
    }

    /// Block until the workers have stopped, which happens once the
    /// listener is closed through a `ShutdownHandle` or `shutdown`.
    pub fn wait(&mut self) -> Result<()> {
        let Some(pool) = self.pool.take() else {
            return Ok(());
        };

        let result = pool.join();

        // Workers held the other references; this releases the socket.
        self.listener = None;

        match &result {
            Ok(()) => tracing::info!("All workers stopped"),
            Err(e) => tracing::error!(error = %e, "Worker shutdown failed"),
        }
        result
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        let listener = self.listener.as_ref().map(Arc::downgrade).unwrap_or_default();
        ShutdownHandle { listener }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn thread_count(&self) -> usize {
        self.config.thread_count
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Current state of every worker; all `Stopped` after shutdown.
    pub fn worker_states(&self) -> Vec<WorkerState> {
        match &self.pool {
            Some(pool) => pool.states(),
            None => vec![WorkerState::Stopped; self.config.thread_count],
        }
    }

    pub fn is_running(&self) -> bool {
        self.pool.is_some()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if self.is_running() {
            if let Err(e) = self.shutdown() {
                tracing::error!(error = %e, "Shutdown on drop failed");
            }
        }
    }
}

/// Cloneable trigger for stopping a server from another thread.
///
/// Holds only a weak reference, so it never keeps the listening socket
/// alive after the server has released it.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    listener: Weak<Listener>,
}

impl ShutdownHandle {
    /// Close the listener; workers stop at their next accept.
    pub fn trigger(&self) {
        if let Some(listener) = self.listener.upgrade() {
            listener.close();
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.listener
            .upgrade()
            .map(|listener| listener.is_closed())
            .unwrap_or(true)
    }
}
