pub mod net;
pub mod signal;
