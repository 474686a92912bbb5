//! What the console is showing, as opposed to what it is playing.
//!
//! `App` holds the screen mode, the volume overlay, the playlist cursor and
//! the Select prompt. Playback state stays in `crate::player`.

mod model;

pub use model::*;
