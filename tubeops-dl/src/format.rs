//! yt-dlp format selection.
//!
//! A [`FormatSelector`] is an ordered list of [`FormatRule`]s. yt-dlp tries each
//! rule in turn and downloads the first one it can satisfy, so the list always
//! ends with a rule that matches any stream.
//!
//! ```
//! use tubeops_dl::format::FormatSelector;
//!
//! let selector = FormatSelector::max_height(1080);
//! assert_eq!(
//!     selector.to_string(),
//!     "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/bestvideo[height<=1080]+bestaudio/best[ext=mp4]/best"
//! );
//! ```

use std::fmt;

/// Which stream kind a selector picks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stream {
    /// Best video-only stream
    BestVideo,
    /// Best audio-only stream
    BestAudio,
    /// Best stream carrying both video and audio
    Best,
}

impl Stream {
    fn as_str(self) -> &'static str {
        match self {
            Self::BestVideo => "bestvideo",
            Self::BestAudio => "bestaudio",
            Self::Best => "best",
        }
    }
}

/// Constraint applied to a stream, written as `[...]` in yt-dlp syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    /// `height<=N`
    MaxHeight(i64),
    /// `ext=...`
    Ext(&'static str),
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxHeight(height) => write!(f, "[height<={height}]"),
            Self::Ext(ext) => write!(f, "[ext={ext}]"),
        }
    }
}

/// One stream pick with its filters, e.g. `bestvideo[height<=720][ext=mp4]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamSelector {
    pub stream: Stream,
    pub filters: Vec<Filter>,
}

impl StreamSelector {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Height ceiling of this selector, if any.
    pub fn max_height(&self) -> Option<i64> {
        self.filters.iter().find_map(|f| match f {
            Filter::MaxHeight(h) => Some(*h),
            Filter::Ext(_) => None,
        })
    }
}

impl fmt::Display for StreamSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stream.as_str())?;
        self.filters.iter().try_for_each(|filter| write!(f, "{filter}"))
    }
}

/// A single alternative: one stream, or several streams merged with `+`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatRule(pub Vec<StreamSelector>);

impl FormatRule {
    /// True for a bare `best`, which matches whenever anything is available.
    pub fn is_universal(&self) -> bool {
        matches!(self.0.as_slice(), [s] if s.stream == Stream::Best && s.filters.is_empty())
    }

    /// True if any stream in the rule carries a height ceiling of `height`.
    pub fn limits_height_to(&self, height: i64) -> bool {
        self.0.iter().any(|s| s.max_height() == Some(height))
    }
}

impl fmt::Display for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

/// Ordered format preference, rendered with `/` between alternatives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatSelector {
    rules: Vec<FormatRule>,
}

impl FormatSelector {
    /// Prefer mp4/m4a up to `height`, then any container up to `height`,
    /// then the best mp4, then anything.
    ///
    /// Non-positive heights are passed through; such a selector simply falls
    /// through to the height-free rules for real content.
    pub fn max_height(height: i64) -> Self {
        use Stream::*;

        let rules = vec![
            FormatRule(vec![
                StreamSelector::new(BestVideo)
                    .filter(Filter::MaxHeight(height))
                    .filter(Filter::Ext("mp4")),
                StreamSelector::new(BestAudio).filter(Filter::Ext("m4a")),
            ]),
            FormatRule(vec![
                StreamSelector::new(BestVideo).filter(Filter::MaxHeight(height)),
                StreamSelector::new(BestAudio),
            ]),
            FormatRule(vec![StreamSelector::new(Best).filter(Filter::Ext("mp4"))]),
            FormatRule(vec![StreamSelector::new(Best)]),
        ];

        Self { rules }
    }

    pub fn rules(&self) -> &[FormatRule] {
        &self.rules
    }
}

impl fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl From<FormatSelector> for String {
    fn from(selector: FormatSelector) -> Self {
        selector.to_string()
    }
}
