//! Video presets: quality-capped mp4 playlist downloads.
//!
//! ```no_run
//! use tubeops_dl::{dl::download, progress::ProgressReporter, video::VideoPreset};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let preset = VideoPreset { max_height: 1080, subtitles: true };
//! download("https://youtube.com/playlist?list=example", preset.into(), ProgressReporter::stdout())?;
//! # Ok(())
//! # }
//! ```
//!
//! **Output:** mp4 files with metadata tags, subtitles embedded when requested.

use crate::dl::{DownloadOptions, PostProcessor};
use crate::format::FormatSelector;

/// Default height ceiling (4K).
pub const DEFAULT_MAX_HEIGHT: i64 = 2160;

/// Subtitle languages in order of preference: Turkish, English, then any.
pub const SUBTITLE_LANGS: [&str; 3] = ["tr", "en", ""];

/// Fragments fetched in parallel for DASH/HLS formats.
pub const CONCURRENT_FRAGMENTS: u32 = 4;

/// Container every download ends up in.
pub const CONTAINER: &str = "mp4";

/// Quality and subtitle choices for a video download.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VideoPreset {
    pub max_height: i64,
    pub subtitles: bool,
}

impl Default for VideoPreset {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_MAX_HEIGHT,
            subtitles: false,
        }
    }
}

impl VideoPreset {
    /// Metadata and mp4 remux always; subtitle embedding on request.
    pub fn postprocessors(&self) -> Vec<PostProcessor> {
        let mut processors = vec![
            PostProcessor::metadata(),
            PostProcessor::video_remuxer(CONTAINER),
        ];
        if self.subtitles {
            processors.push(PostProcessor::embed_subtitle());
        }
        processors
    }
}

impl From<VideoPreset> for DownloadOptions {
    /// Playlist preset: capped mp4 + m4a merge, restricted filenames, resumable,
    /// failing items skipped. Output template, rate limit and ffmpeg location
    /// are left for the caller.
    fn from(preset: VideoPreset) -> Self {
        let (writesubtitles, subtitleslangs) = if preset.subtitles {
            let langs = SUBTITLE_LANGS.iter().map(|l| l.to_string()).collect();
            (Some(true), Some(langs))
        } else {
            (None, None)
        };

        Self {
            format: Some(FormatSelector::max_height(preset.max_height).into()),
            merge_output_format: Some(CONTAINER.to_string()),
            restrictfilenames: Some(true),
            noplaylist: Some(false),
            ignoreerrors: Some(true),
            continuedl: Some(true),
            concurrent_fragment_downloads: Some(CONCURRENT_FRAGMENTS),
            writesubtitles,
            writeautomaticsub: writesubtitles,
            subtitleslangs,
            postprocessors: Some(preset.postprocessors()),
            noprogress: Some(true),
            ..Default::default()
        }
    }
}
