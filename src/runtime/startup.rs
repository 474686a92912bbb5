use std::ffi::OsString;
use std::path::PathBuf;

use tracing::info;

use crate::config::LibrarySettings;
use crate::library::load_tracks;
use crate::player::Player;

/// Positional arguments as paths; flags are not supported.
pub fn initial_inputs<I>(args: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter().map(PathBuf::from).collect()
}

/// Load files and folders into the playlist. Returns how many tracks were added.
pub fn insert_cartridge(player: &mut Player, inputs: &[PathBuf], library: &LibrarySettings) -> usize {
    if inputs.is_empty() {
        return 0;
    }
    let tracks = load_tracks(inputs, library);
    let added = tracks.len();
    info!(inputs = inputs.len(), added, "inserting cartridge");
    if added > 0 {
        player.add_files(tracks);
    }
    added
}
