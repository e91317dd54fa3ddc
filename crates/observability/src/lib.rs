//! Logging setup shared by processes that embed the estimation engine.
//!
//! The engine itself only emits `tracing` spans/events; installing a
//! subscriber is the embedding process's job.

pub mod logging;

pub use logging::{LogFormat, init, init_with};
