//! HTTP request handlers for the REST API.

pub mod admin;
pub mod confession;
pub mod countdown;
pub mod wizard;
