//! yt-dlp Python API wrappers.
//!
//! Type-safe bindings to [yt-dlp](https://github.com/yt-dlp/yt-dlp) `YoutubeDL` parameters.
//!
//! ```no_run
//! use tubeops_dl::dl::download;
//! use tubeops_dl::progress::ProgressReporter;
//! use tubeops_dl::video::VideoPreset;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opts = VideoPreset::default().into();
//! download("https://youtube.com/playlist?list=example", opts, ProgressReporter::stdout())?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::progress::{ProgressEvent, ProgressHook};
use pyo3::ffi::c_str;
use pyo3::prelude::*;
use pyo3::types::{PyCFunction, PyDict, PyTuple};
use std::collections::HashMap;
use std::sync::Mutex;

/// Filename templates using `%(field)s` syntax. Key `default` required.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct OutputTemplates(pub Option<HashMap<String, String>>);

impl OutputTemplates {
    /// Create with a single default template.
    pub fn simple(default: String) -> Self {
        Self(Some(HashMap::from([("default".to_string(), default)])))
    }
}

/// Post-download operation: `key` (e.g., `"FFmpegVideoRemuxer"`), optional `preferedformat`.
///
/// The misspelt `preferedformat` is yt-dlp's own parameter name.
#[derive(Clone, Debug, Default, PartialEq, Eq, IntoPyObject)]
pub struct PostProcessor {
    pub key: String,
    pub preferedformat: Option<String>,
}

impl PostProcessor {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            preferedformat: None,
        }
    }

    /// Write title, uploader and similar tags into the container.
    pub fn metadata() -> Self {
        Self::new("FFmpegMetadata")
    }

    /// Remux into `format` without re-encoding.
    pub fn video_remuxer(format: &str) -> Self {
        Self {
            preferedformat: Some(format.to_string()),
            ..Self::new("FFmpegVideoRemuxer")
        }
    }

    /// Embed downloaded subtitles into the video file.
    pub fn embed_subtitle() -> Self {
        Self::new("EmbedSubtitle")
    }
}

/// yt-dlp download configuration passed to `YoutubeDL(params)`.
///
/// Only the keys below are recognised. `None` fields are dropped before the
/// dict reaches yt-dlp, which then applies its own default.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct DownloadOptions {
    pub format: Option<String>,
    pub merge_output_format: Option<String>,
    pub outtmpl: Option<OutputTemplates>,
    pub restrictfilenames: Option<bool>,
    pub noplaylist: Option<bool>,
    pub ignoreerrors: Option<bool>,
    pub continuedl: Option<bool>,
    pub concurrent_fragment_downloads: Option<u32>,
    /// Bytes per second
    pub ratelimit: Option<u64>,
    pub writesubtitles: Option<bool>,
    pub writeautomaticsub: Option<bool>,
    pub subtitleslangs: Option<Vec<String>>,
    pub postprocessors: Option<Vec<PostProcessor>>,
    /// ffmpeg binary or the directory containing it
    pub ffmpeg_location: Option<String>,
    pub noprogress: Option<bool>,
    pub quiet: Option<bool>,
}

/// What [`probe`] found about the external tools.
#[derive(Clone, Debug)]
pub struct Probe {
    pub yt_dlp_version: String,
    pub ffmpeg_available: bool,
}

fn load_module(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    PyModule::from_code(py, c_str!(include_str!("./dl.py")), c"dl.py", c"dl")
}

/// Import yt-dlp and ask it whether ffmpeg can be found.
///
/// `ffmpeg_location` is resolved the same way the download will resolve it.
pub fn probe(ffmpeg_location: Option<&str>) -> Result<Probe> {
    Python::attach(|py| {
        let module = load_module(py).map_err(Error::Python)?;

        let (yt_dlp_version, ffmpeg_available) = module
            .getattr("probe")
            .and_then(|f| f.call1((ffmpeg_location,)))
            .and_then(|r| r.extract::<(String, bool)>())
            .map_err(|e| Error::from_py(py, e))?;

        Ok(Probe {
            yt_dlp_version,
            ffmpeg_available,
        })
    })
}

/// Fail with a missing-dependency error unless yt-dlp and ffmpeg are usable.
pub fn check_dependencies(ffmpeg_location: Option<&str>) -> Result<Probe> {
    let probe = probe(ffmpeg_location)?;

    if !probe.ffmpeg_available {
        return Err(Error::MissingFfmpeg {
            location: ffmpeg_location.map(str::to_string),
        });
    }

    tracing::debug!(yt_dlp = probe.yt_dlp_version, "dependencies available");

    Ok(probe)
}

/// Wrap a [`ProgressHook`] as a Python callable.
///
/// The callable never raises: events that fail to extract are logged and
/// skipped so yt-dlp's download loop keeps running.
fn progress_callback<H: ProgressHook>(
    py: Python<'_>,
    hook: H,
) -> PyResult<Bound<'_, PyCFunction>> {
    let hook = Mutex::new(hook);

    PyCFunction::new_closure(
        py,
        Some(c"progress_hook"),
        None,
        move |args: &Bound<'_, PyTuple>, _kwargs: Option<&Bound<'_, PyDict>>| -> PyResult<()> {
            match args.get_item(0).and_then(|d| d.extract::<ProgressEvent>()) {
                Ok(event) => match hook.lock() {
                    Ok(mut hook) => hook.on_progress(&event),
                    Err(_) => tracing::warn!("progress hook poisoned, event dropped"),
                },
                Err(e) => tracing::warn!(error = %e, "malformed progress event"),
            }
            Ok(())
        },
    )
}

/// Download a URL (video or playlist), reporting progress to `hook`.
///
/// Returns yt-dlp's return code. With `ignoreerrors` set, failed playlist
/// items make it non-zero without raising.
pub fn download<H: ProgressHook>(url: &str, opts: DownloadOptions, hook: H) -> Result<i32> {
    Python::attach(|py| {
        let module = load_module(py).map_err(Error::Python)?;

        let py_hook = progress_callback(py, hook).map_err(Error::Python)?;
        let py_params = opts.into_pyobject(py).map_err(Error::Python)?;

        let retcode = module
            .getattr("download")
            .and_then(|f| f.call1((url, py_params, py_hook)))
            .map_err(|e| Error::from_py(py, e))?;

        retcode.extract().map_err(Error::Python)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::types::PyAnyMethods;
    use std::ffi::CStr;
    use std::sync::mpsc;

    /// Compare Python object with dict/list literal using recursive equality.
    #[track_caller]
    fn assert_py_eq(py: Python, py_obj: &Bound<PyAny>, expected: &'static CStr) {
        let py_expected = py.eval(expected, None, None).unwrap();
        assert!(py_obj.eq(&py_expected).unwrap(), "{py_obj} != {py_expected}");
    }

    #[test]
    fn output_templates_default() {
        Python::attach(|py| {
            let templates = OutputTemplates::default();
            let py_obj = templates.into_pyobject(py).unwrap();
            assert!(py_obj.is_none());
        });
    }

    #[test]
    fn output_templates_simple() {
        Python::attach(|py| {
            let templates = OutputTemplates::simple("%(title)s.%(ext)s".to_string());
            let py_obj = templates.into_pyobject(py).unwrap();
            assert_py_eq(py, py_obj.as_any(), c"{'default': '%(title)s.%(ext)s'}");
        });
    }

    #[test]
    fn postprocessor_remuxer() {
        Python::attach(|py| {
            let py_obj = PostProcessor::video_remuxer("mp4").into_pyobject(py).unwrap();
            assert_py_eq(
                py,
                py_obj.as_any(),
                c"{'key': 'FFmpegVideoRemuxer', 'preferedformat': 'mp4'}",
            );
        });
    }

    #[test]
    fn postprocessors_list() {
        Python::attach(|py| {
            let processors = vec![PostProcessor::metadata(), PostProcessor::embed_subtitle()];

            let py_obj = processors.into_pyobject(py).unwrap();
            assert_py_eq(
                py,
                &py_obj,
                c"[{'key': 'FFmpegMetadata', 'preferedformat': None}, {'key': 'EmbedSubtitle', 'preferedformat': None}]",
            );
        });
    }

    #[test]
    fn dl_options_custom() {
        Python::attach(|py| {
            let opts = DownloadOptions {
                format: Some("best".to_string()),
                ratelimit: Some(5 * 1024 * 1024),
                subtitleslangs: Some(vec!["tr".to_string(), "en".to_string()]),
                ..Default::default()
            };
            let py_obj = opts.into_pyobject(py).unwrap();
            let py_obj = py_obj.as_any();

            assert_eq!(py_obj.len().unwrap(), 16);
            assert!(!py_obj.contains("no_warnings").unwrap());
            assert_eq!(
                py_obj.get_item("format").unwrap().extract::<String>().unwrap(),
                "best"
            );
            assert_eq!(
                py_obj.get_item("ratelimit").unwrap().extract::<u64>().unwrap(),
                5 * 1024 * 1024
            );
            assert_py_eq(py, &py_obj.get_item("subtitleslangs").unwrap(), c"['tr', 'en']");
            assert!(py_obj.get_item("ffmpeg_location").unwrap().is_none());
        });
    }

    #[test]
    fn prune_drops_none_recursively() {
        Python::attach(|py| {
            let module = load_module(py).unwrap();
            let opts = DownloadOptions {
                format: Some("best".to_string()),
                postprocessors: Some(vec![PostProcessor::metadata()]),
                ..Default::default()
            };

            let pruned = module
                .getattr("_prune")
                .unwrap()
                .call1((opts.into_pyobject(py).unwrap(),))
                .unwrap();

            assert_py_eq(
                py,
                &pruned,
                c"{'format': 'best', 'postprocessors': [{'key': 'FFmpegMetadata'}]}",
            );
        });
    }

    #[test]
    fn callback_forwards_events() {
        Python::attach(|py| {
            let (tx, rx) = mpsc::channel();
            let hook = move |event: &ProgressEvent| tx.send(event.clone()).unwrap();
            let callback = progress_callback(py, hook).unwrap();

            let event = py
                .eval(
                    c"{'status': 'finished', 'downloaded_bytes': None, 'total_bytes': None, 'total_bytes_estimate': None, 'speed': None, 'eta': None, 'filename': 'video.mp4'}",
                    None,
                    None,
                )
                .unwrap();
            callback.call1((event,)).unwrap();

            let received = rx.try_recv().unwrap();
            assert_eq!(received.filename.as_deref(), Some("video.mp4"));
        });
    }

    #[test]
    fn callback_never_raises() {
        Python::attach(|py| {
            let (tx, rx) = mpsc::channel();
            let hook = move |event: &ProgressEvent| tx.send(event.clone()).unwrap();
            let callback = progress_callback(py, hook).unwrap();

            // Missing keys, wrong types and no argument at all.
            assert!(callback.call1((py.eval(c"{}", None, None).unwrap(),)).is_ok());
            assert!(callback.call1((42,)).is_ok());
            assert!(callback.call0().is_ok());
            assert!(rx.try_recv().is_err());
        });
    }
}
