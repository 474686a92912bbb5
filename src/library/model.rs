use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque per-track identity, stable for the lifetime of the session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    /// A fresh random base-36 id.
    pub fn random() -> Self {
        let mut n: u64 = rand::random();
        let mut id = String::with_capacity(ID_LEN);
        for _ in 0..ID_LEN {
            id.push(ID_ALPHABET[(n % 36) as usize] as char);
            n /= 36;
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Track {
    pub id: TrackId,
    /// Display name: the file name without its last extension.
    pub name: String,
    pub path: PathBuf,
    pub duration: Option<Duration>,
}

impl Track {
    /// Wrap `path` in a track. The file is not decoded; a duration is
    /// recorded when the container header can be read.
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let duration = lofty::read_from_path(path)
            .ok()
            .map(|tagged| tagged.properties().duration())
            .filter(|d| !d.is_zero());

        Self {
            id: TrackId::random(),
            name: display_name(&file_name),
            path: path.to_path_buf(),
            duration,
        }
    }
}

/// Strip the last `.ext` segment from `file_name`.
///
/// `"track.final.mp3"` becomes `"track.final"`. Names without an extension
/// or with an empty one (`"trailing."`) are returned unchanged.
///
/// Unlike a bare extension strip, a leading dot does not start an extension:
/// `".mp3"` is kept whole so a dotfile never shows up as an empty title.
pub fn display_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < file_name.len() => file_name[..dot].to_string(),
        _ => file_name.to_string(),
    }
}
