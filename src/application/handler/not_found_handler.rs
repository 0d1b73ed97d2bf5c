use crate::application::handler::request_handler::{RequestHandler, RequestOutcome};
use crate::common::constants::NOT_FOUND_RESPONSE;

/// Handles nothing: every request gets a bare 404.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotFoundHandler;

impl RequestHandler for NotFoundHandler {
    fn handle(&self, _request: &[u8]) -> RequestOutcome {
        RequestOutcome::response(NOT_FOUND_RESPONSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_404() {
        match NotFoundHandler.handle(b"GET / HTTP/1.1\r\n\r\n") {
            RequestOutcome::Response(bytes) => assert!(bytes.starts_with(b"HTTP/1.1 404")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
