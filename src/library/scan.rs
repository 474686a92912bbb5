use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

pub(crate) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and return the audio files below it, sorted by path.
fn walk_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_audio_file(p, settings))
        .collect();

    files.sort();
    files
}

/// Expand user input into a flat list of files, preserving argument order.
///
/// Files are taken as given regardless of extension; directories contribute
/// their audio files. Paths that do not exist are logged and skipped.
pub fn expand_inputs(inputs: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = walk_dir(input, settings);
            debug!(dir = %input.display(), files = found.len(), "expanded directory");
            out.extend(found);
        } else if input.is_file() {
            out.push(input.clone());
        } else {
            warn!(path = %input.display(), "skipping input: no such file or directory");
        }
    }
    out
}

/// Expand `inputs` and wrap every resulting file in a `Track`.
pub fn load_tracks(inputs: &[PathBuf], settings: &LibrarySettings) -> Vec<Track> {
    expand_inputs(inputs, settings)
        .iter()
        .map(|p| Track::from_path(p))
        .collect()
}

/// Interpret a path typed into the Select prompt: trims whitespace and
/// surrounding quotes and expands a leading `~`.
pub fn parse_typed_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| {
            trimmed
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
        })
        .unwrap_or(trimmed);

    if unquoted.is_empty() {
        return None;
    }

    if unquoted == "~" {
        return env::var_os("HOME").map(PathBuf::from);
    }
    if let Some(rest) = unquoted.strip_prefix("~/") {
        if let Some(home) = env::var_os("HOME") {
            return Some(PathBuf::from(home).join(rest));
        }
    }
    Some(PathBuf::from(unquoted))
}
