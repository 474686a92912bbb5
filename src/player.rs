//! Playback controller: the playlist, the session state and the commands
//! that drive them.
//!
//! Commands only change `PlaybackSession`. After every command a set of
//! observer rules (`sync`) compares the session against what was last pushed
//! to the output and applies the difference, so the rules are idempotent and
//! never care *why* the session changed.

mod model;

pub use model::*;
