pub mod listener;
pub mod server;
pub mod stats;
pub mod worker_pool;

pub use listener::Listener;
pub use server::{Server, ShutdownHandle};
pub use stats::{PoolStats, StatsSnapshot};
pub use worker_pool::{WorkerPool, WorkerSettings, WorkerState};
