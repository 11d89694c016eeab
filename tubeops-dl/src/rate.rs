//! Download rate limits such as `5M` or `500K`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SUFFIXES: [char; 6] = ['k', 'm', 'g', 't', 'p', 'e'];

/// Maximum download rate in bytes per second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RateLimit(pub u64);

impl RateLimit {
    pub fn bytes_per_sec(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRateLimitError {
    #[error("rate limit is empty")]
    Empty,

    #[error("invalid rate limit {0:?}: expected a number with optional K, M, G, T, P or E suffix")]
    Invalid(String),

    #[error("rate limit {0:?} is too large")]
    Overflow(String),
}

impl FromStr for RateLimit {
    type Err = ParseRateLimitError;

    /// Parse `<number>[<suffix>][B|iB]`, suffixes are binary multiples.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(ParseRateLimitError::Empty);
        }

        let invalid = || ParseRateLimitError::Invalid(s.to_string());

        let body = input
            .strip_suffix("iB")
            .or_else(|| input.strip_suffix(['B', 'b']))
            .unwrap_or(input);

        let (number, exponent) = match body.chars().last() {
            Some(c) if c.is_ascii_alphabetic() => {
                let lower = c.to_ascii_lowercase();
                let position = SUFFIXES.iter().position(|&x| x == lower).ok_or_else(invalid)?;
                (&body[..body.len() - 1], position as i32 + 1)
            }
            _ => (body, 0),
        };

        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(invalid());
        }

        let value: f64 = number.parse().map_err(|_| invalid())?;
        let bytes = (value * 1024f64.powi(exponent)).round();

        if bytes >= u64::MAX as f64 {
            return Err(ParseRateLimitError::Overflow(s.to_string()));
        }

        Ok(Self(bytes as u64))
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} B/s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<u64, ParseRateLimitError> {
        s.parse::<RateLimit>().map(RateLimit::bytes_per_sec)
    }

    #[test]
    fn plain_bytes() {
        assert_eq!(parse("1024"), Ok(1024));
        assert_eq!(parse("0"), Ok(0));
    }

    #[test]
    fn binary_suffixes() {
        assert_eq!(parse("500K"), Ok(500 * 1024));
        assert_eq!(parse("5M"), Ok(5 * 1024 * 1024));
        assert_eq!(parse("1g"), Ok(1024 * 1024 * 1024));
        assert_eq!(parse("2T"), Ok(2 * 1024u64.pow(4)));
    }

    #[test]
    fn fractional_values() {
        assert_eq!(parse("1.5M"), Ok(1_572_864));
        assert_eq!(parse("0.5K"), Ok(512));
    }

    #[test]
    fn byte_unit_tail() {
        assert_eq!(parse("5MB"), Ok(5 * 1024 * 1024));
        assert_eq!(parse("5MiB"), Ok(5 * 1024 * 1024));
        assert_eq!(parse("100B"), Ok(100));
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(parse(" 5M "), Ok(5 * 1024 * 1024));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse(""), Err(ParseRateLimitError::Empty));
        assert!(matches!(parse("fast"), Err(ParseRateLimitError::Invalid(_))));
        assert!(matches!(parse("5X"), Err(ParseRateLimitError::Invalid(_))));
        assert!(matches!(parse("-5M"), Err(ParseRateLimitError::Invalid(_))));
        assert!(matches!(parse("M"), Err(ParseRateLimitError::Invalid(_))));
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            parse("99999999E"),
            Err(ParseRateLimitError::Overflow(_))
        ));
    }
}
