//! Type-safe Rust bindings to the [yt-dlp](https://github.com/yt-dlp/yt-dlp) Python library
//! for quality-capped playlist downloads.
//!
//! ## Modules
//!
//! - [`dl`] - Core yt-dlp API wrappers
//! - [`video`] - mp4 playlist preset
//! - [`format`] - Format selector builder
//! - [`template`] - Output path template
//! - [`progress`] - Progress hook and console reporter
//! - [`rate`] - Rate limit parsing
//!
//! ## Quick Start
//!
//! **Playlist preset** (mp4 up to 1080p):
//! ```no_run
//! use tubeops_dl::dl::{DownloadOptions, download};
//! use tubeops_dl::progress::ProgressReporter;
//! use tubeops_dl::template::OutputTemplate;
//! use tubeops_dl::video::VideoPreset;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut opts: DownloadOptions = VideoPreset { max_height: 1080, subtitles: false }.into();
//! opts.outtmpl = Some((&OutputTemplate::new("downloads")).into());
//!
//! download("https://youtube.com/playlist?list=example", opts, ProgressReporter::stdout())?;
//! # Ok(())
//! # }
//! ```
//!
//! **Custom hook**:
//! ```no_run
//! use tubeops_dl::dl::{DownloadOptions, download};
//! use tubeops_dl::progress::ProgressEvent;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opts = DownloadOptions {
//!     format: Some("best".to_string()),
//!     quiet: Some(true),
//!     ..Default::default()
//! };
//!
//! download("https://youtube.com/watch?v=example", opts, |event: &ProgressEvent| {
//!     eprintln!("{:.1}%", event.percent());
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod dl;
pub mod error;
pub mod format;
pub mod progress;
pub mod rate;
pub mod template;
pub mod video;

pub use error::{Error, Result};
