use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by all workers.
///
/// Relaxed ordering is enough: readers only want totals, and the final
/// values are read after the workers have been joined.
#[derive(Debug, Default)]
pub struct PoolStats {
    accepted: AtomicU64,
    closed: AtomicU64,
    requests: AtomicU64,
    responses: AtomicU64,
    error_responses: AtomicU64,
    peer_closed: AtomicU64,
    timeouts: AtomicU64,
    transport_errors: AtomicU64,
    handler_errors: AtomicU64,
    accept_errors: AtomicU64,
}

/// Point-in-time copy of `PoolStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Connections handed to a worker
    pub accepted: u64,
    /// Connections closed by a worker
    pub closed: u64,
    /// Requests passed to the handler
    pub requests: u64,
    /// Handler responses written in full
    pub responses: u64,
    /// Generic error responses written in full
    pub error_responses: u64,
    /// Peers that closed before sending anything
    pub peer_closed: u64,
    pub timeouts: u64,
    /// Read or write failures on a connection
    pub transport_errors: u64,
    /// Handler failures, including panics
    pub handler_errors: u64,
    pub accept_errors: u64,
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_closed(&self) {
        self.closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_response(&self) {
        self.responses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error_response(&self) {
        self.error_responses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_closed(&self) {
        self.peer_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handler_error(&self) {
        self.handler_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_accept_error(&self) {
        self.accept_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            closed: self.closed.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            responses: self.responses.load(Ordering::Relaxed),
            error_responses: self.error_responses.load(Ordering::Relaxed),
            peer_closed: self.peer_closed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            handler_errors: self.handler_errors.load(Ordering::Relaxed),
            accept_errors: self.accept_errors.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Connections accepted but not yet closed
    pub fn in_flight(&self) -> u64 {
        self.accepted.saturating_sub(self.closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = PoolStats::new();
        stats.record_accepted();
        stats.record_accepted();
        stats.record_closed();
        stats.record_handler_error();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.accepted, 2);
        assert_eq!(snapshot.closed, 1);
        assert_eq!(snapshot.handler_errors, 1);
        assert_eq!(snapshot.in_flight(), 1);
    }
}
