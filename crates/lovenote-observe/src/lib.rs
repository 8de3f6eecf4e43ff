//! Logging and trace export setup for the `lovenote` binary.

pub mod tracing_setup;
