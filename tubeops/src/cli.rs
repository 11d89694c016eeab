//! CLI argument definitions using clap.

use clap::Parser;
use eyre::{Report, Result};
use tubeops_dl::Error as DlError;

/// Exit status for a missing dependency or a failed download.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status after the user interrupted the download.
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug, Parser)]
#[command(name = "tube")]
#[command(about = "Download a YouTube playlist as high-quality mp4 files using yt-dlp")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub args: crate::dl::Args,
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    crate::dl::execute(cli.args.try_into()?)
}

/// How a run ended when it did not succeed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// yt-dlp or ffmpeg unavailable at startup
    MissingDependency,
    /// SIGINT during the download
    Interrupted,
    /// Anything else
    Download,
}

impl Failure {
    /// Classify a report by the first download error in its chain.
    pub fn classify(report: &Report) -> Self {
        let dl_error = report
            .chain()
            .find_map(|e| e.downcast_ref::<DlError>());

        match dl_error {
            Some(DlError::Interrupted) => Self::Interrupted,
            Some(e) if e.is_missing_dependency() => Self::MissingDependency,
            _ => Self::Download,
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            Self::Interrupted => EXIT_INTERRUPTED,
            Self::MissingDependency | Self::Download => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;
    use std::path::Path;

    #[test]
    fn parses_defaults() {
        let cli = Cli::parse_from(["tube", "https://example.com/playlist"]);

        match &cli.args {
            crate::dl::Args {
                url,
                output,
                max_height: 2160,
                rate_limit: None,
                subtitles: false,
                ffmpeg: None,
            } if url == "https://example.com/playlist" && output == Path::new("downloads") => {}
            _ => panic!("unexpected args: {:?}", cli.args),
        }
    }

    #[test]
    fn parses_all_options() {
        let cli = Cli::parse_from([
            "tube",
            "https://example.com/playlist",
            "-o",
            "/tmp/videos",
            "--max-height",
            "720",
            "--rate-limit",
            "5M",
            "--subtitles",
            "--ffmpeg",
            "/usr/local/bin/ffmpeg",
        ]);

        match &cli.args {
            crate::dl::Args {
                output,
                max_height: 720,
                rate_limit: Some(rate),
                subtitles: true,
                ffmpeg: Some(ffmpeg),
                ..
            } if output == Path::new("/tmp/videos")
                && rate.bytes_per_sec() == 5 * 1024 * 1024
                && ffmpeg == Path::new("/usr/local/bin/ffmpeg") => {}
            _ => panic!("unexpected args: {:?}", cli.args),
        }
    }

    #[test]
    fn accepts_non_positive_height() {
        let cli = Cli::parse_from(["tube", "https://example.com", "--max-height", "-1"]);
        assert_eq!(cli.args.max_height, -1);

        let cli = Cli::parse_from(["tube", "https://example.com", "--max-height", "0"]);
        assert_eq!(cli.args.max_height, 0);
    }

    #[test]
    fn rejects_bad_rate_limit() {
        let result = Cli::try_parse_from(["tube", "https://example.com", "--rate-limit", "fast"]);
        assert!(result.is_err());
    }

    #[test]
    fn requires_url() {
        assert!(Cli::try_parse_from(["tube"]).is_err());
    }

    #[test]
    fn classifies_failures() {
        let interrupted = Report::new(DlError::Interrupted);
        let missing = Err::<(), _>(DlError::MissingFfmpeg { location: None })
            .wrap_err("dependency check")
            .unwrap_err();
        let other = eyre::eyre!("HTTP Error 403: Forbidden");

        assert_eq!(Failure::classify(&interrupted), Failure::Interrupted);
        assert_eq!(Failure::classify(&missing), Failure::MissingDependency);
        assert_eq!(Failure::classify(&other), Failure::Download);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(Failure::Interrupted.exit_code(), 130);
        assert_eq!(Failure::MissingDependency.exit_code(), 1);
        assert_eq!(Failure::Download.exit_code(), 1);
    }
}
