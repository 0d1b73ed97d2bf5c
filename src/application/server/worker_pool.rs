//! Fixed pool of accept workers.
//!
//! Every worker loops on the shared `Listener`:
//!
//! ```text
//! Starting → Idle ⇄ Serving
//!             │
//!             └── listener closed ──→ Stopped
//! ```
//!
//! Whatever goes wrong with a single connection (peer gone, read timeout,
//! handler failure or panic, broken pipe) ends that connection only. The
//! worker goes back to `accept` afterwards.

use crate::application::handler::{RequestHandler, RequestOutcome};
use crate::application::server::listener::Listener;
use crate::application::server::stats::PoolStats;
use crate::common::constants::{ACCEPT_ERROR_BACKOFF_MS, ERROR_RESPONSE};
use crate::common::error::{AcceptError, ReadError, Result, ServerError};
use crate::core::net::connection::Connection;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// Spawned, not yet waiting for connections
    Starting = 0,
    /// Blocked in accept
    Idle = 1,
    /// Processing one connection
    Serving = 2,
    /// Left the loop after the listener closed
    Stopped = 3,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Starting,
            1 => WorkerState::Idle,
            2 => WorkerState::Serving,
            _ => WorkerState::Stopped,
        }
    }
}

/// State cell a worker publishes and the server reads.
#[derive(Debug)]
struct StateSlot(AtomicU8);

impl StateSlot {
    fn new() -> Self {
        Self(AtomicU8::new(WorkerState::Starting as u8))
    }

    fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }

    fn get(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::SeqCst))
    }
}

struct Worker {
    name: String,
    listener: Arc<Listener>,
    handler: Arc<dyn RequestHandler>,
    stats: Arc<PoolStats>,
    state: Arc<StateSlot>,
    read_timeout: Option<Duration>,
}

impl Worker {
    fn run(self) {
        tracing::debug!(worker = %self.name, "Worker started");

        loop {
            self.state.set(WorkerState::Idle);

            let connection = match self.listener.accept() {
                Ok(connection) => connection,
                Err(AcceptError::Closed) => break,
                Err(AcceptError::Io(e)) => {
                    self.stats.record_accept_error();
                    tracing::warn!(worker = %self.name, error = %e, "Accept failed, retrying");
                    thread::sleep(Duration::from_millis(ACCEPT_ERROR_BACKOFF_MS));
                    continue;
                }
            };

            self.state.set(WorkerState::Serving);
            self.stats.record_accepted();
            self.serve(connection);
        }

        self.state.set(WorkerState::Stopped);
        tracing::debug!(worker = %self.name, "Worker stopped");
    }

    /// Service one connection and close it, whatever happened.
    fn serve(&self, mut connection: Connection) {
        tracing::debug!(
            worker = %self.name,
            connection_id = %connection.id(),
            peer_addr = %connection.peer_addr(),
            "Connection accepted"
        );

        self.exchange(&mut connection);

        if connection.close() {
            self.stats.record_closed();
        }
        tracing::debug!(connection_id = %connection.id(), "Connection closed");
    }

    fn exchange(&self, connection: &mut Connection) {
        let request = match connection.read_request(self.read_timeout) {
            Ok(request) => request,
            Err(ReadError::Closed) => {
                self.stats.record_peer_closed();
                tracing::debug!(connection_id = %connection.id(), "Peer closed before sending a request");
                return;
            }
            Err(ReadError::Timeout) => {
                self.stats.record_timeout();
                tracing::debug!(connection_id = %connection.id(), "Timed out waiting for a request");
                return;
            }
            Err(ReadError::Transport(e)) => {
                self.stats.record_transport_error();
                tracing::warn!(connection_id = %connection.id(), error = %e, "Failed to read request");
                return;
            }
        };

        self.stats.record_request();
        tracing::debug!(connection_id = %connection.id(), bytes = request.len(), "Request read");

        let (payload, is_error) = match self.invoke_handler(&request) {
            RequestOutcome::Response(bytes) => (bytes, false),
            RequestOutcome::HandlerError(reason) => {
                self.stats.record_handler_error();
                tracing::warn!(connection_id = %connection.id(), reason = %reason, "Handler failed");
                (ERROR_RESPONSE.to_vec(), true)
            }
            RequestOutcome::TransportError(reason) => {
                self.stats.record_transport_error();
                tracing::warn!(connection_id = %connection.id(), reason = %reason, "Handler transport failed");
                (ERROR_RESPONSE.to_vec(), true)
            }
        };

        match connection.write_response(&payload) {
            Ok(()) if is_error => self.stats.record_error_response(),
            Ok(()) => self.stats.record_response(),
            Err(e) => {
                self.stats.record_transport_error();
                tracing::warn!(connection_id = %connection.id(), error = %e, "Failed to write response");
            }
        }
    }

    /// A panicking handler costs one connection, not the worker.
    fn invoke_handler(&self, request: &[u8]) -> RequestOutcome {
        let handler = &self.handler;
        match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(request))) {
            Ok(outcome) => outcome,
            Err(payload) => RequestOutcome::HandlerError(format!(
                "handler panicked: {}",
                panic_message(payload.as_ref())
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Settings each worker needs besides the listener and handler
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerSettings {
    pub read_timeout: Option<Duration>,
}

pub struct WorkerPool {
    workers: Vec<(String, JoinHandle<()>)>,
    states: Vec<Arc<StateSlot>>,
}

impl WorkerPool {
    /// Start `count` workers on `listener`.
    ///
    /// If a thread cannot be created the listener is closed, the workers
    /// already running are joined, and the spawn error is returned.
    pub fn spawn(
        count: usize,
        listener: Arc<Listener>,
        handler: Arc<dyn RequestHandler>,
        stats: Arc<PoolStats>,
        settings: WorkerSettings,
    ) -> Result<Self> {
        let mut pool = Self {
            workers: Vec::with_capacity(count),
            states: Vec::with_capacity(count),
        };

        for index in 0..count {
            let name = format!("worker-{}", index);
            let state = Arc::new(StateSlot::new());
            let worker = Worker {
                name: name.clone(),
                listener: Arc::clone(&listener),
                handler: Arc::clone(&handler),
                stats: Arc::clone(&stats),
                state: Arc::clone(&state),
                read_timeout: settings.read_timeout,
            };

            match thread::Builder::new().name(name.clone()).spawn(move || worker.run()) {
                Ok(handle) => {
                    pool.workers.push((name, handle));
                    pool.states.push(state);
                }
                Err(source) => {
                    listener.close();
                    // The spawn error is what the caller needs to see.
                    let _ = pool.join();
                    return Err(ServerError::SpawnError { name, source });
                }
            }
        }

        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> Vec<WorkerState> {
        self.states.iter().map(|slot| slot.get()).collect()
    }

    /// Wait for every worker to stop. Only returns once all threads are
    /// joined, even if one of them panicked.
    pub fn join(self) -> Result<()> {
        let mut failed = None;

        for (name, handle) in self.workers {
            if handle.join().is_err() {
                tracing::error!(worker = %name, "Worker thread panicked");
                failed.get_or_insert(name);
            }
        }

        match failed {
            Some(name) => Err(ServerError::WorkerJoinError(name)),
            None => Ok(()),
        }
    }
}
