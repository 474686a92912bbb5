//! File intake: turning user-supplied paths into playlist tracks.
//!
//! Explicit files are accepted as-is (decodability is only discovered at
//! playback time); directories are walked and filtered by extension.

mod model;
mod scan;

pub use model::*;
pub use scan::*;
