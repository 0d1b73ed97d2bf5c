// Common test utilities to reduce code duplication

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use poolhttpd::application::config::models::{ListenAddress, ServerConfig};
use poolhttpd::application::handler::RequestHandler;
use poolhttpd::application::server::Server;

/// Loopback, ephemeral port, short read timeout
pub fn create_test_config(backlog: u32, thread_count: usize) -> ServerConfig {
    ServerConfig::new(ListenAddress::localhost(0), backlog, thread_count)
        .with_read_timeout(Some(Duration::from_secs(5)))
}

/// Start a server on an ephemeral port
#[allow(dead_code)]
pub fn start_test_server(thread_count: usize, handler: Arc<dyn RequestHandler>) -> Server {
    let config = create_test_config(64, thread_count);
    Server::start(&config, handler).expect("Failed to start server")
}

/// Send raw bytes and read until the server closes the connection
#[allow(dead_code)]
pub fn send_request(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("Failed to connect to server");
    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();

    stream.write_all(request).unwrap();
    stream.flush().unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    response
}

/// Poll until `condition` holds, failing the test after five seconds
#[allow(dead_code)]
pub fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached within 5s");
        thread::sleep(Duration::from_millis(5));
    }
}
