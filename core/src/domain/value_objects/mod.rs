//! Value objects representing immutable domain concepts.

pub mod session_response;

pub use session_response::SessionResponse;
