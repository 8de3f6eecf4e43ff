//! REST API layer: router, handlers, extractors and the response envelope.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
