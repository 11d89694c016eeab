//! Error types for tubeops-dl.

use pyo3::PyErr;
use pyo3::exceptions::{PyImportError, PyKeyboardInterrupt};
use pyo3::prelude::*;
use thiserror::Error;

/// Download error variants.
#[derive(Debug, Error)]
pub enum Error {
    /// The `yt_dlp` Python module could not be imported
    #[error("yt-dlp is not installed: {0}")]
    MissingYtDlp(PyErr),

    /// ffmpeg was not found on PATH or at the configured location
    #[error("ffmpeg not found{}", at_location(.location))]
    MissingFfmpeg { location: Option<String> },

    /// The user interrupted the download (SIGINT)
    #[error("interrupted by user")]
    Interrupted,

    /// Any other failure raised by yt-dlp or the Python runtime
    #[error(transparent)]
    Python(PyErr),
}

impl Error {
    /// Classify a Python exception raised while talking to yt-dlp.
    pub(crate) fn from_py(py: Python<'_>, err: PyErr) -> Self {
        if err.is_instance_of::<PyKeyboardInterrupt>(py) {
            Self::Interrupted
        } else if err.is_instance_of::<PyImportError>(py) {
            Self::MissingYtDlp(err)
        } else {
            Self::Python(err)
        }
    }

    /// True for errors caused by an unavailable external dependency.
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingYtDlp(_) | Self::MissingFfmpeg { .. })
    }
}

fn at_location(location: &Option<String>) -> String {
    location
        .as_deref()
        .map(|l| format!(" at {l:?}"))
        .unwrap_or_default()
}

/// Result type alias for tubeops-dl operations.
pub type Result<T> = std::result::Result<T, Error>;
