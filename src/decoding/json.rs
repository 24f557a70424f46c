use std::collections::HashSet;

use bytes::Bytes;
use chrono::Utc;
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};
use smallvec::{SmallVec, smallvec};
use snafu::{OptionExt, ensure};

use super::{
    Deserializer, LoggerTypeResolver, Segment,
    heuristic::{self, TimestampPolicy},
};
use crate::{
    datetime::TimeZone,
    error::{
        ConfigError, DecodeError, DuplicateTimestampSnafu, EmptyFieldNameSnafu,
        InvalidTimeZoneSnafu, MissingTimeKeySnafu, TimeKeyUndefinedSnafu,
        TimeLayoutUndefinedSnafu,
    },
    record::{Record, Value},
};

pub(super) fn default_time_location() -> String {
    "local".to_owned()
}

/// Config used to build a [`JsonDecoder`] that reads the timestamp from one
/// configured key.
#[derive(Clone, Debug, Derivative, Deserialize, Serialize, PartialEq, Eq)]
#[derivative(Default)]
#[serde(deny_unknown_fields)]
pub struct JsonDecoderConfig {
    /// Key holding the record timestamp. Required.
    #[serde(default)]
    pub time_key: String,

    /// `strftime` layout of the timestamp string. Required.
    #[serde(default)]
    pub time_layout: String,

    /// IANA zone used when the layout carries no offset, or `local`.
    #[serde(default = "default_time_location")]
    #[derivative(Default(value = "default_time_location()"))]
    pub time_location: String,

    /// Keys dropped from the payload before anything else looks at them.
    #[serde(default)]
    pub keys_ignore: Vec<String>,

    /// Take the record type from the first segment of the logger name
    /// instead of the last.
    #[serde(default)]
    pub use_first_segment: bool,
}

impl JsonDecoderConfig {
    /// Build the `JsonDecoder` from this configuration.
    pub fn build(&self) -> Result<JsonDecoder, ConfigError> {
        ensure!(!self.time_key.is_empty(), TimeKeyUndefinedSnafu);
        ensure!(!self.time_layout.is_empty(), TimeLayoutUndefinedSnafu);
        let timezone = parse_time_location(&self.time_location)?;

        JsonDecoder::new(
            TimestampStrategy::Key {
                key: self.time_key.clone(),
                layout: self.time_layout.clone(),
                timezone,
            },
            Segment::from_first_segment_flag(self.use_first_segment),
            self.keys_ignore.iter().cloned(),
        )
    }
}

pub(super) fn parse_time_location(name: &str) -> Result<TimeZone, ConfigError> {
    TimeZone::parse(name).context(InvalidTimeZoneSnafu { name })
}

/// Where a [`JsonDecoder`] takes the record timestamp from.
#[derive(Clone, Debug, PartialEq)]
pub enum TimestampStrategy {
    /// Parse the string under `key` with `layout`. A payload without the key
    /// is rejected.
    Key {
        key: String,
        layout: String,
        timezone: TimeZone,
    },
    /// Infer field types from string contents and pick up timestamps from the
    /// reserved `timestamp` and `@Timestamp` keys.
    Detect {
        timezone: TimeZone,
        policy: TimestampPolicy,
    },
}

/// Turns one JSON object into one [`Record`].
///
/// The record type comes from the logger name, fields come from the object's
/// keys in lexical order.
#[derive(Clone, Debug)]
pub struct JsonDecoder {
    resolver: LoggerTypeResolver,
    timestamp: TimestampStrategy,
    keys_ignore: HashSet<String>,
}

impl JsonDecoder {
    pub fn new(
        timestamp: TimestampStrategy,
        segment: Segment,
        keys_ignore: impl IntoIterator<Item = String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            resolver: LoggerTypeResolver::new(segment)?,
            timestamp,
            keys_ignore: keys_ignore.into_iter().collect(),
        })
    }

    pub const fn timestamp_strategy(&self) -> &TimestampStrategy {
        &self.timestamp
    }

    /// Name used to label internal events.
    pub const fn codec_name(&self) -> &'static str {
        match self.timestamp {
            TimestampStrategy::Key { .. } => "json",
            TimestampStrategy::Detect { .. } => "heuristic_json",
        }
    }

    pub fn decode(&self, logger: &str, payload: &[u8]) -> Result<Record, DecodeError> {
        let received_at = match self.timestamp {
            TimestampStrategy::Key { .. } => 0,
            TimestampStrategy::Detect { .. } => receipt_time(),
        };
        self.decode_at(logger, payload, received_at)
    }

    /// Same as [`JsonDecoder::decode`] with an explicit receipt time in
    /// nanoseconds. Only the detecting strategy reads it.
    pub fn decode_at(
        &self,
        logger: &str,
        payload: &[u8],
        received_at: i64,
    ) -> Result<Record, DecodeError> {
        let object = parse_object(payload)?;
        let record_type = self.resolver.resolve(logger)?;

        let mut record = Record::new(logger).with_type(record_type);
        record.fields.reserve(object.len());

        match &self.timestamp {
            TimestampStrategy::Key {
                key,
                layout,
                timezone,
            } => self.decode_keyed(object, key, layout, timezone, &mut record)?,
            TimestampStrategy::Detect { timezone, policy } => {
                self.decode_detected(object, timezone, *policy, &mut record)?;
                if !record.has_timestamp() {
                    record.timestamp = received_at;
                }
            }
        }

        Ok(record)
    }

    fn decode_keyed(
        &self,
        object: Map<String, JsonValue>,
        time_key: &str,
        layout: &str,
        timezone: &TimeZone,
        record: &mut Record,
    ) -> Result<(), DecodeError> {
        let mut found = false;

        for (key, value) in object {
            if self.keys_ignore.contains(&key) {
                continue;
            }
            if key == time_key {
                let text = match value {
                    JsonValue::String(text) => text,
                    other => {
                        return Err(DecodeError::InvalidTimestamp {
                            reason: format!("expected a string, found {}", json_kind(&other)),
                            key,
                        });
                    }
                };
                record.timestamp = parse_timestamp(&key, &text, layout, timezone)?;
                found = true;
                continue;
            }
            ensure!(!key.is_empty(), EmptyFieldNameSnafu);

            let value = convert_value(&key, value)?;
            record.push(key, value);
        }

        ensure!(found, MissingTimeKeySnafu { key: time_key });
        Ok(())
    }

    fn decode_detected(
        &self,
        object: Map<String, JsonValue>,
        timezone: &TimeZone,
        policy: TimestampPolicy,
        record: &mut Record,
    ) -> Result<(), DecodeError> {
        let mut timestamp_key: Option<String> = None;

        for (key, value) in object {
            if self.keys_ignore.contains(&key) {
                continue;
            }
            ensure!(!key.is_empty(), EmptyFieldNameSnafu);

            let value = match value {
                JsonValue::String(text) => match heuristic::infer(&key, text, timezone) {
                    heuristic::Inferred::Value(value) => value,
                    heuristic::Inferred::Timestamp(nanos) => {
                        match policy {
                            TimestampPolicy::Field => {
                                // a raw `@Timestamp` sorts before `timestamp`
                                ensure!(
                                    record.get(heuristic::TIMESTAMP_FIELD).is_none(),
                                    DuplicateTimestampSnafu { key }
                                );
                                record.push(heuristic::TIMESTAMP_FIELD, nanos);
                            }
                            TimestampPolicy::Primary => {
                                ensure!(timestamp_key.is_none(), DuplicateTimestampSnafu { key });
                                record.timestamp = nanos;
                                timestamp_key = Some(key);
                            }
                        }
                        continue;
                    }
                },
                value => convert_value(&key, value)?,
            };
            record.push(key, value);
        }

        Ok(())
    }
}

impl Deserializer for JsonDecoder {
    fn parse(&self, logger: &str, bytes: Bytes) -> Result<SmallVec<[Record; 1]>, DecodeError> {
        Ok(smallvec![self.decode(logger, &bytes)?])
    }
}

/// Wall clock in nanoseconds since the epoch, `0` past the year 2262.
fn receipt_time() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

fn parse_object(payload: &[u8]) -> Result<Map<String, JsonValue>, DecodeError> {
    match serde_json::from_slice::<JsonValue>(payload) {
        Ok(JsonValue::Object(object)) => Ok(object),
        Ok(other) => Err(DecodeError::MalformedPayload {
            reason: format!("expected an object, found {}", json_kind(&other)),
        }),
        Err(error) => Err(DecodeError::MalformedPayload {
            reason: error.to_string(),
        }),
    }
}

/// Parses `text` into nanoseconds since the epoch. The epoch itself counts
/// as invalid since a zero timestamp means unset.
pub(super) fn parse_timestamp(
    key: &str,
    text: &str,
    layout: &str,
    timezone: &TimeZone,
) -> Result<i64, DecodeError> {
    let datetime = timezone
        .datetime_from_str(text, layout)
        .map_err(|error| DecodeError::invalid_timestamp(key, &error))?;

    match datetime.timestamp_nanos_opt() {
        Some(0) => Err(DecodeError::InvalidTimestamp {
            key: key.to_owned(),
            reason: "Timestamp is zero".to_owned(),
        }),
        Some(nanos) => Ok(nanos),
        None => Err(DecodeError::InvalidTimestamp {
            key: key.to_owned(),
            reason: format!("{datetime} is out of range"),
        }),
    }
}

fn convert_value(key: &str, value: JsonValue) -> Result<Value, DecodeError> {
    match value {
        JsonValue::Number(number) => Ok(number_value(&number)),
        JsonValue::String(s) => Ok(Value::String(s)),
        JsonValue::Bool(b) => Ok(Value::Boolean(b)),
        other => Err(DecodeError::UnsupportedValueType {
            key: key.to_owned(),
            kind: json_kind(&other),
        }),
    }
}

fn number_value(number: &Number) -> Value {
    match number.as_i64() {
        Some(i) => Value::Integer(i),
        // fraction, exponent or above i64::MAX
        None => Value::Double(number.as_f64().unwrap_or(f64::NAN)),
    }
}

const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
