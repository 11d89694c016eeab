//! Output path template for playlist downloads.
//!
//! Layout: `<output_dir>/<playlist title>/<NNN> - <title> [<id>].<ext>`
//!
//! yt-dlp expands the template itself; [`OutputTemplate::render`] reproduces the
//! same expansion locally for a known set of fields.

use crate::dl::OutputTemplates;
use std::path::{Path, PathBuf};

/// Playlist directory, falling back when the entry has no playlist.
pub const PLAYLIST_DIR_TEMPLATE: &str = "%(playlist_title|Unknown Playlist)s";

/// Item filename: zero-padded index, title and id.
pub const ITEM_FILE_TEMPLATE: &str = "%(playlist_index|000)03d - %(title)s [%(id)s].%(ext)s";

const UNKNOWN_PLAYLIST: &str = "Unknown Playlist";
const UNKNOWN_INDEX: &str = "000";

/// Fields of a single downloaded entry used by the template.
#[derive(Clone, Debug, Default)]
pub struct EntryFields<'a> {
    pub playlist_title: Option<&'a str>,
    pub playlist_index: Option<u32>,
    pub title: &'a str,
    pub id: &'a str,
    pub ext: &'a str,
}

/// Output template rooted at an output directory.
#[derive(Clone, Debug)]
pub struct OutputTemplate {
    output_dir: PathBuf,
}

impl OutputTemplate {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Full yt-dlp template string.
    pub fn template(&self) -> String {
        self.output_dir
            .join(PLAYLIST_DIR_TEMPLATE)
            .join(ITEM_FILE_TEMPLATE)
            .to_string_lossy()
            .into_owned()
    }

    /// Path of an entry relative to the output directory.
    ///
    /// No sanitisation or truncation happens here; yt-dlp applies
    /// `restrictfilenames` when it expands the real template.
    pub fn relative_path(entry: &EntryFields) -> PathBuf {
        let dir = entry.playlist_title.unwrap_or(UNKNOWN_PLAYLIST);
        let index = entry
            .playlist_index
            .map_or_else(|| UNKNOWN_INDEX.to_string(), |i| format!("{i:03}"));

        let file = format!("{index} - {} [{}].{}", entry.title, entry.id, entry.ext);

        Path::new(dir).join(file)
    }

    /// Absolute (output-dir rooted) path of an entry.
    pub fn render(&self, entry: &EntryFields) -> PathBuf {
        self.output_dir.join(Self::relative_path(entry))
    }
}

impl From<&OutputTemplate> for OutputTemplates {
    fn from(template: &OutputTemplate) -> Self {
        OutputTemplates::simple(template.template())
    }
}
