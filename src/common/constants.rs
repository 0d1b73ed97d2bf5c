pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BACKLOG: u32 = 5;
pub const DEFAULT_THREAD_COUNT: usize = 10;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB, one read per request

/// Pause after a non-fatal accept error so a persistent failure such as
/// `EMFILE` does not spin the worker.
pub const ACCEPT_ERROR_BACKOFF_MS: u64 = 50;

/// Upper bound for each loopback connect used to wake blocked accepts.
pub const WAKE_CONNECT_TIMEOUT_MS: u64 = 100;

/// Sent when the handler fails; the connection is closed right after.
pub const ERROR_RESPONSE: &[u8] =
    b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

pub const NOT_FOUND_RESPONSE: &[u8] =
    b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
