use crate::application::handler::request_handler::{RequestHandler, RequestOutcome};

/// Sends every request straight back
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

impl RequestHandler for EchoHandler {
    fn handle(&self, request: &[u8]) -> RequestOutcome {
        RequestOutcome::Response(request.to_vec())
    }
}
