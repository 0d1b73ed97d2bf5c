/// Result of servicing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Bytes to send back verbatim
    Response(Vec<u8>),
    /// The handler could not produce a response
    HandlerError(String),
    /// A transport the handler depends on failed
    TransportError(String),
}

impl RequestOutcome {
    pub fn response(bytes: impl Into<Vec<u8>>) -> Self {
        RequestOutcome::Response(bytes.into())
    }

    pub fn is_response(&self) -> bool {
        matches!(self, RequestOutcome::Response(_))
    }
}

/// Trait for turning raw request bytes into a response.
///
/// Called concurrently from every worker, so implementations must not rely
/// on exclusive access. The bytes are exactly what one read returned; a
/// handler that needs more framing than that has to do it itself.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: &[u8]) -> RequestOutcome;
}

impl<F> RequestHandler for F
where
    F: Fn(&[u8]) -> RequestOutcome + Send + Sync,
{
    fn handle(&self, request: &[u8]) -> RequestOutcome {
        self(request)
    }
}
