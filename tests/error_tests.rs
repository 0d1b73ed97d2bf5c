// Error handling tests - one bad connection never takes a worker down

use std::io::Read;
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use poolhttpd::application::config::models::{ListenAddress, ServerConfig};
use poolhttpd::application::handler::{EchoHandler, RequestOutcome};
use poolhttpd::application::server::Server;
use poolhttpd::common::constants::ERROR_RESPONSE;
use poolhttpd::common::error::ServerError;

mod common;
use common::{send_request, start_test_server, wait_until};

#[test]
fn test_failing_handler_gets_generic_error_response() {
    let handler = |_: &[u8]| RequestOutcome::HandlerError("no route".to_string());
    let mut server = start_test_server(1, Arc::new(handler));

    // read_to_end returning means the server closed the connection.
    let response = send_request(server.local_addr(), b"GET /missing HTTP/1.1\r\n\r\n");
    assert_eq!(response, ERROR_RESPONSE);

    let text = String::from_utf8_lossy(&response);
    assert!(text.starts_with("HTTP/1.1 500"));
    assert!(text.ends_with("\r\n\r\n"));

    server.shutdown().unwrap();
    let stats = server.stats();
    assert_eq!(stats.handler_errors, 1);
    assert_eq!(stats.error_responses, 1);
    assert_eq!(stats.closed, 1);
}

#[test]
fn test_server_continues_after_error() {
    let handler = |request: &[u8]| {
        if request.starts_with(b"bad") {
            RequestOutcome::HandlerError("rejected".to_string())
        } else {
            RequestOutcome::response(request)
        }
    };
    let mut server = start_test_server(1, Arc::new(handler));
    let addr = server.local_addr();

    assert_eq!(send_request(addr, b"bad request"), ERROR_RESPONSE);
    assert_eq!(send_request(addr, b"good request"), b"good request");

    server.shutdown().unwrap();
}

#[test]
fn test_panicking_handler_does_not_kill_worker() {
    let handler = |request: &[u8]| -> RequestOutcome {
        if request == b"panic" {
            panic!("handler bug");
        }
        RequestOutcome::response(request)
    };
    let mut server = start_test_server(1, Arc::new(handler));
    let addr = server.local_addr();

    for _ in 0..3 {
        assert_eq!(send_request(addr, b"panic"), ERROR_RESPONSE);
    }
    assert_eq!(send_request(addr, b"still alive"), b"still alive");

    // The worker never panicked itself, so joining succeeds.
    server.shutdown().unwrap();
    assert_eq!(server.stats().handler_errors, 3);
}

#[test]
fn test_silent_client_times_out() {
    let config = ServerConfig::new(ListenAddress::localhost(0), 4, 1)
        .with_read_timeout(Some(Duration::from_millis(100)));
    let mut server = Server::start(&config, Arc::new(EchoHandler)).unwrap();
    let addr = server.local_addr();

    let mut silent = TcpStream::connect(addr).unwrap();
    silent.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let mut buf = Vec::new();
    // Closed by the server without a response.
    silent.read_to_end(&mut buf).unwrap();
    assert!(buf.is_empty());

    assert_eq!(send_request(addr, b"after timeout"), b"after timeout");

    server.shutdown().unwrap();
    let stats = server.stats();
    assert_eq!(stats.timeouts, 1);
    assert_eq!(stats.accepted, stats.closed);
}

#[test]
fn test_bind_to_address_in_use_is_fatal() {
    let server = start_test_server(1, Arc::new(EchoHandler));
    let port = server.local_addr().port();

    let config = ServerConfig::new(ListenAddress::localhost(port), 1, 1);
    match Server::start(&config, Arc::new(EchoHandler)) {
        Err(ServerError::BindError { addr, .. }) => assert_eq!(addr.port(), port),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("second bind on port {} succeeded", port),
    }
}

#[test]
fn test_abandoned_clients_do_not_starve_pool() {
    let mut server = start_test_server(2, Arc::new(EchoHandler));
    let addr = server.local_addr();

    for _ in 0..10 {
        drop(TcpStream::connect(addr).unwrap());
    }
    wait_until(|| server.stats().peer_closed + server.stats().transport_errors == 10);

    assert_eq!(send_request(addr, b"ping"), b"ping");
    server.shutdown().unwrap();
}
