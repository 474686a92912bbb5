//! Audio subsystem: the playable output, its frequency analyser and the
//! backend that creates both.
//!
//! One `AudioGraph` exists per session. It is opened lazily by the player
//! and torn down exactly once when the session ends.

mod analyser;
mod error;
mod output;
mod tap;
mod types;

pub use analyser::*;
pub use error::AudioError;
pub use output::RodioBackend;
pub use types::*;

#[cfg(test)]
pub(crate) mod testing;
