pub mod echo_handler;
pub mod not_found_handler;
pub mod request_handler;

pub use echo_handler::EchoHandler;
pub use not_found_handler::NotFoundHandler;
pub use request_handler::{RequestHandler, RequestOutcome};

use crate::application::config::models::HandlerKind;
use std::sync::Arc;

/// Stock handler for the kind named in the configuration
pub fn from_kind(kind: HandlerKind) -> Arc<dyn RequestHandler> {
    match kind {
        HandlerKind::NotFound => Arc::new(NotFoundHandler),
        HandlerKind::Echo => Arc::new(EchoHandler),
    }
}
