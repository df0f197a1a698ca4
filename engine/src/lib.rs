//! Real-time snake simulation: immutable game snapshots, a pure transition
//! function, input buffering, autoplay and a tokio-driven tick loop.

pub mod config;
pub mod logger;
pub mod snake;

mod error;
mod session_rng;

pub use error::EngineError;
pub use session_rng::SessionRng;
