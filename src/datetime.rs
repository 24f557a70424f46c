use std::fmt;

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone as _,
    Utc,
};
use chrono_tz::Tz;

/// Time zone used to interpret timestamps that carry no offset of their own.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimeZone {
    /// The process' local time zone.
    #[default]
    Local,
    Named(Tz),
}

impl TimeZone {
    /// Parses `"local"` or `"Local"` as [`TimeZone::Local`], an empty string
    /// as UTC and anything else as an IANA zone name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "local" | "Local" => Some(Self::Local),
            "" => Some(Self::Named(Tz::UTC)),
            _ => s.parse::<Tz>().ok().map(Self::Named),
        }
    }

    /// Parses `s` with the `strftime` layout `format`.
    ///
    /// A layout carrying its own offset (`%z`, `%:z`, `%#z`, `%+`) is honored
    /// and the zone is ignored. A layout without a time part resolves to
    /// midnight. Wall-clock times that fall into a DST gap fail to parse;
    /// ambiguous ones resolve to the earlier instant.
    pub fn datetime_from_str(&self, s: &str, format: &str) -> Result<DateTime<Utc>, ParseError> {
        if format_has_zone(format) {
            return DateTime::parse_from_str(s, format)
                .map(datetime_to_utc)
                .map_err(ParseError::Format);
        }

        let naive = match NaiveDateTime::parse_from_str(s, format) {
            Ok(naive) => naive,
            Err(error) => match NaiveDate::parse_from_str(s, format) {
                Ok(date) => date.and_time(NaiveTime::MIN),
                Err(_) => return Err(ParseError::Format(error)),
            },
        };

        match self {
            Self::Local => local_to_utc(Local.from_local_datetime(&naive)),
            Self::Named(tz) => local_to_utc(tz.from_local_datetime(&naive)),
        }
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

#[derive(Debug)]
pub enum ParseError {
    Format(chrono::ParseError),
    /// The wall-clock time does not exist in the zone.
    Nonexistent,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(error) => write!(f, "{error}"),
            Self::Nonexistent => f.write_str("local time does not exist in the time zone"),
        }
    }
}

impl std::error::Error for ParseError {}

fn local_to_utc<Z: chrono::TimeZone>(
    result: LocalResult<DateTime<Z>>,
) -> Result<DateTime<Utc>, ParseError> {
    match result {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => Err(ParseError::Nonexistent),
    }
}

fn datetime_to_utc(dt: DateTime<FixedOffset>) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}

/// Does the format specifier have a time zone option?
fn format_has_zone(fmt: &str) -> bool {
    fmt.contains("%z")
        || fmt.contains("%:z")
        || fmt.contains("%#z")
        || fmt.contains("%+")
}
