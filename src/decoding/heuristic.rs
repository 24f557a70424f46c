//! Schema-less decoding: every string is tried as an integer, then as a
//! float, then (under the reserved keys only) as a timestamp, and kept as a
//! string otherwise.

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use super::{
    JsonDecoder, Segment, TimestampStrategy,
    json::{default_time_location, parse_time_location, parse_timestamp},
};
use crate::{datetime::TimeZone, error::ConfigError, record::Value};

/// Keys whose string values are tried as timestamps.
pub const TIMESTAMP_KEYS: [&str; 2] = ["timestamp", "@Timestamp"];

/// Name of the field a detected timestamp is stored under with
/// [`TimestampPolicy::Field`].
pub const TIMESTAMP_FIELD: &str = "@Timestamp";

/// Microsecond-precision ISO 8601 without an offset.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// What happens to a timestamp found under one of the [`TIMESTAMP_KEYS`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Store it as an integer `@Timestamp` field in nanoseconds and stamp the
    /// record with its receipt time.
    #[default]
    Field,
    /// Use it as the record timestamp. More than one is an error; a payload
    /// without one gets its receipt time.
    Primary,
}

/// Config used to build a [`JsonDecoder`] that infers field types.
#[derive(Clone, Debug, Derivative, Deserialize, Serialize, Eq, PartialEq)]
#[derivative(Default)]
#[serde(deny_unknown_fields)]
pub struct HeuristicJsonDecoderConfig {
    #[serde(default = "default_time_location")]
    #[derivative(Default(value = "default_time_location()"))]
    pub time_location: String,

    #[serde(default)]
    pub use_first_segment: bool,

    #[serde(default)]
    pub timestamp_policy: TimestampPolicy,

    #[serde(default)]
    pub keys_ignore: Vec<String>,
}

impl HeuristicJsonDecoderConfig {
    /// Build the `JsonDecoder` from this configuration.
    pub fn build(&self) -> Result<JsonDecoder, ConfigError> {
        let timezone = parse_time_location(&self.time_location)?;

        JsonDecoder::new(
            TimestampStrategy::Detect {
                timezone,
                policy: self.timestamp_policy,
            },
            Segment::from_first_segment_flag(self.use_first_segment),
            self.keys_ignore.iter().cloned(),
        )
    }
}

pub(super) enum Inferred {
    Value(Value),
    Timestamp(i64),
}

pub(super) fn infer(key: &str, text: String, timezone: &TimeZone) -> Inferred {
    if let Ok(i) = text.parse::<i64>() {
        return Inferred::Value(Value::Integer(i));
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => return Inferred::Value(Value::Double(f)),
        _ => {}
    }
    if TIMESTAMP_KEYS.contains(&key) {
        // unparseable timestamps are kept as plain strings
        if let Ok(nanos) = parse_timestamp(key, &text, TIMESTAMP_LAYOUT, timezone) {
            return Inferred::Timestamp(nanos);
        }
    }
    Inferred::Value(Value::String(text))
}
