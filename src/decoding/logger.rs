use regex::Regex;
use snafu::{OptionExt, ResultExt};

use crate::error::{ConfigError, DecodeError, LoggerPatternSnafu, MalformedLoggerNameSnafu};

/// Which segment of a dotted logger name becomes the record type.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Segment {
    /// `app.module.RequestHandled` → `RequestHandled`
    #[default]
    Last,
    /// `app.module.RequestHandled` → `app`
    First,
}

impl Segment {
    pub const fn from_first_segment_flag(use_first_segment: bool) -> Self {
        if use_first_segment {
            Self::First
        } else {
            Self::Last
        }
    }

    const fn pattern(self) -> &'static str {
        match self {
            // greedy up to the final separator, non-empty trailing segment
            Self::Last => r"(?s)^.*\.([^.]+)$",
            Self::First => r"(?s)^([^.]+)\..+$",
        }
    }
}

/// Derives a record type from a logger name such as `svc.api.Ping`.
///
/// The name must contain at least one `.`; the pattern is compiled once when
/// the resolver is built.
#[derive(Clone, Debug)]
pub struct LoggerTypeResolver {
    pattern: Regex,
    segment: Segment,
}

impl LoggerTypeResolver {
    pub fn new(segment: Segment) -> Result<Self, ConfigError> {
        let pattern = Regex::new(segment.pattern()).context(LoggerPatternSnafu)?;
        Ok(Self { pattern, segment })
    }

    pub const fn segment(&self) -> Segment {
        self.segment
    }

    pub fn resolve(&self, logger: &str) -> Result<String, DecodeError> {
        self.pattern
            .captures(logger)
            .and_then(|captures| captures.get(1))
            .map(|segment| segment.as_str().to_owned())
            .context(MalformedLoggerNameSnafu { logger })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("app.sub.Thing", "Thing")]
    #[case("app.module.RequestHandled", "RequestHandled")]
    #[case("svc.Ping", "Ping")]
    #[case(".Ping", "Ping")]
    #[case("a..b", "b")]
    fn last_segment(#[case] logger: &str, #[case] expected: &str) {
        let resolver = LoggerTypeResolver::new(Segment::Last).unwrap();
        assert_eq!(resolver.resolve(logger).unwrap(), expected);
    }

    #[rstest]
    #[case("app.sub.Thing", "app")]
    #[case("ulogd.Flow", "ulogd")]
    fn first_segment(#[case] logger: &str, #[case] expected: &str) {
        let resolver = LoggerTypeResolver::new(Segment::First).unwrap();
        assert_eq!(resolver.resolve(logger).unwrap(), expected);
    }

    #[rstest]
    #[case(Segment::Last, "NoDots")]
    #[case(Segment::Last, "trailing.")]
    #[case(Segment::Last, "")]
    #[case(Segment::First, "NoDots")]
    #[case(Segment::First, ".leading")]
    #[case(Segment::First, "trailing.")]
    fn malformed(#[case] segment: Segment, #[case] logger: &str) {
        let resolver = LoggerTypeResolver::new(segment).unwrap();
        let error = resolver.resolve(logger).unwrap_err();
        assert!(matches!(error, DecodeError::MalformedLoggerName { .. }));
    }

    #[test]
    fn flag_selects_segment() {
        assert_eq!(Segment::from_first_segment_flag(true), Segment::First);
        assert_eq!(Segment::from_first_segment_flag(false), Segment::Last);
    }
}
