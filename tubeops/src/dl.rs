//! Download a playlist or single video as capped-quality mp4 files.

use color_eyre::Section;
use eyre::{Context, Result, eyre};
use std::path::PathBuf;
use tubeops_dl::dl::{DownloadOptions, check_dependencies, download};
use tubeops_dl::progress::ProgressReporter;
use tubeops_dl::rate::RateLimit;
use tubeops_dl::template::OutputTemplate;
use tubeops_dl::video::{DEFAULT_MAX_HEIGHT, VideoPreset};

const INSTALL_HINT: &str =
    "install yt-dlp with `pip install yt-dlp` and put ffmpeg on PATH, or point --ffmpeg at it";

/// CLI arguments for a download.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// YouTube playlist URL (video URLs also supported)
    pub url: String,

    /// Output directory
    #[arg(short, long, default_value = "downloads")]
    pub output: PathBuf,

    /// Maximum video height to download (e.g. 2160, 1440, 1080, 720)
    #[arg(long, default_value_t = DEFAULT_MAX_HEIGHT, allow_negative_numbers = true)]
    pub max_height: i64,

    /// Rate limit in bytes per second (e.g. 5M, 1M, 500K)
    #[arg(long)]
    pub rate_limit: Option<RateLimit>,

    /// Download available subtitles (tr, en, then any) and embed them
    #[arg(long)]
    pub subtitles: bool,

    /// Path to the ffmpeg binary or the directory containing it
    #[arg(long)]
    pub ffmpeg: Option<PathBuf>,
}

/// Resolved configuration for a download.
#[derive(Debug)]
pub struct Config {
    pub url: String,
    pub template: OutputTemplate,
    pub preset: VideoPreset,
    pub rate_limit: Option<RateLimit>,
    pub ffmpeg: Option<String>,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let ffmpeg = args
            .ffmpeg
            .map(|path| {
                path.into_os_string()
                    .into_string()
                    .map_err(|p| eyre!("ffmpeg path is not valid UTF-8: {p:?}"))
            })
            .transpose()?;

        // yt-dlp takes the output template as a str
        let output = args
            .output
            .into_os_string()
            .into_string()
            .map_err(|p| eyre!("output path is not valid UTF-8: {p:?}"))?;

        Ok(Self {
            url: args.url,
            template: OutputTemplate::new(output),
            preset: VideoPreset {
                max_height: args.max_height,
                subtitles: args.subtitles,
            },
            rate_limit: args.rate_limit,
            ffmpeg,
        })
    }
}

impl Config {
    /// yt-dlp options for this download.
    pub fn options(&self) -> DownloadOptions {
        let mut opts: DownloadOptions = self.preset.into();

        opts.outtmpl = Some((&self.template).into());
        opts.ratelimit = self.rate_limit.map(RateLimit::bytes_per_sec);
        opts.ffmpeg_location = self.ffmpeg.clone();

        opts
    }
}

pub fn execute(config: Config) -> Result<()> {
    let probe = match check_dependencies(config.ffmpeg.as_deref()) {
        Ok(probe) => probe,
        Err(e) if e.is_missing_dependency() => {
            return Err(eyre::Report::new(e).suggestion(INSTALL_HINT));
        }
        Err(e) => return Err(e).wrap_err("failed to probe yt-dlp"),
    };

    let output_dir = config.template.output_dir();
    std::fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("failed to create output directory: {:?}", output_dir.display()))?;

    let opts = config.options();

    tracing::info!(
        url = config.url,
        output = ?output_dir.display(),
        max_height = config.preset.max_height,
        yt_dlp = probe.yt_dlp_version,
        "starting download"
    );
    tracing::debug!(?opts, "resolved yt-dlp options");

    println!(
        "Starting download with options:\n- Output: {}\n- Max height: {}\n",
        output_dir.display(),
        config.preset.max_height
    );

    let retcode = download(&config.url, opts, ProgressReporter::stdout())
        .wrap_err_with(|| format!("failed to download {}", config.url))?;

    if retcode != 0 {
        tracing::warn!(retcode, "some items could not be downloaded");
    }

    println!("\nDone.");

    Ok(())
}
