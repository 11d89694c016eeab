//! Console progress reporting for yt-dlp progress hooks.
//!
//! yt-dlp calls the hook synchronously with a status dict. While a file is
//! downloading the reporter keeps rewriting a single line; once the file is
//! finished it ends that line and announces post-processing.
//!
//! ```text
//! [DL]   50.00% 512.00 B/1.00 KB @ 256.00 B/s ETA 2s
//! [MERGE] Post-processing 'video.mp4' ...
//! ```

use pyo3::prelude::*;
use std::io::{self, Write};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Snapshot passed to progress hooks.
///
/// Extracted from the dict yt-dlp hands to `progress_hooks`; every field is
/// optional because yt-dlp omits keys it does not know yet.
#[derive(Clone, Debug, Default, PartialEq, FromPyObject)]
#[pyo3(from_item_all)]
pub struct ProgressEvent {
    /// `downloading`, `finished`, `error`, ...
    pub status: Option<String>,
    pub downloaded_bytes: Option<f64>,
    pub total_bytes: Option<f64>,
    pub total_bytes_estimate: Option<f64>,
    /// Bytes per second
    pub speed: Option<f64>,
    /// Seconds remaining
    pub eta: Option<f64>,
    pub filename: Option<String>,
}

/// Status tag of a [`ProgressEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status<'a> {
    Downloading,
    Finished,
    Other(Option<&'a str>),
}

impl ProgressEvent {
    pub fn status(&self) -> Status<'_> {
        match self.status.as_deref() {
            Some("downloading") => Status::Downloading,
            Some("finished") => Status::Finished,
            other => Status::Other(other),
        }
    }

    /// Total size for display, preferring a non-zero exact count over the
    /// estimate. A zero estimate is kept and shown as `0.00 B`.
    pub fn total(&self) -> Option<f64> {
        nonzero(self.total_bytes).or(self.total_bytes_estimate)
    }

    /// Completion in percent, 0.0 when no non-zero total is known.
    pub fn percent(&self) -> f64 {
        match nonzero(self.total()) {
            Some(total) => self.downloaded_bytes.unwrap_or(0.0) / total * 100.0,
            None => 0.0,
        }
    }
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Format a byte count with binary units (B through TB), or `?` if unknown.
pub fn human_readable_size(bytes: Option<f64>) -> String {
    let Some(bytes) = bytes else {
        return "?".to_string();
    };

    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.2} {}", UNITS[unit])
}

/// Text for one event, or `None` for statuses that are not displayed.
///
/// Download lines end in `\r` so the next one overwrites them.
pub fn render(event: &ProgressEvent) -> Option<String> {
    match event.status() {
        Status::Downloading => {
            let downloaded = event.downloaded_bytes.or(Some(0.0));

            let mut parts = vec![
                format!("{:6.2}%", event.percent()),
                format!(
                    "{}/{}",
                    human_readable_size(downloaded),
                    human_readable_size(event.total())
                ),
            ];

            if let Some(speed) = nonzero(event.speed) {
                parts.push(format!("@ {}/s", human_readable_size(Some(speed))));
            }
            if let Some(eta) = nonzero(event.eta) {
                parts.push(format!("ETA {eta:.0}s"));
            }

            Some(format!("[DL]  {}\r", parts.join(" ")))
        }
        Status::Finished => {
            let filename = event.filename.as_deref().unwrap_or("file");
            Some(format!("\n[MERGE] Post-processing '{filename}' ...\n"))
        }
        Status::Other(_) => None,
    }
}

/// Synchronous receiver of progress events.
///
/// Called on the download thread from inside yt-dlp; implementations must not
/// block beyond console output and must not panic.
pub trait ProgressHook: Send + 'static {
    fn on_progress(&mut self, event: &ProgressEvent);
}

impl<F> ProgressHook for F
where
    F: FnMut(&ProgressEvent) + Send + 'static,
{
    fn on_progress(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Writes [`render`]ed progress to a console-like writer.
#[derive(Debug)]
pub struct ProgressReporter<W> {
    out: W,
}

impl ProgressReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write + Send + 'static> ProgressHook for ProgressReporter<W> {
    fn on_progress(&mut self, event: &ProgressEvent) {
        let Some(text) = render(event) else {
            tracing::trace!(status = ?event.status, "ignored progress status");
            return;
        };

        if let Err(e) = self.write(&text) {
            tracing::debug!(error = %e, "failed to write progress");
        }
    }
}
