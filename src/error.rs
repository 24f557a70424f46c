use snafu::Snafu;

use crate::datetime;

/// Raised while building a decoder or encoder. A component that fails with
/// one of these is never constructed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display(
        "timestamp_precision {:?} has to be one of [ns, us, ms, s, m, h]",
        precision
    ))]
    InvalidPrecision { precision: String },

    #[snafu(display("time_key has to be defined"))]
    TimeKeyUndefined,

    #[snafu(display("time_layout has to be defined"))]
    TimeLayoutUndefined,

    #[snafu(display("Unknown time zone {:?}", name))]
    InvalidTimeZone { name: String },

    #[snafu(display("Invalid logger pattern: {}", source))]
    LoggerPattern { source: regex::Error },

    #[snafu(display("Invalid configuration: {}", source))]
    Toml { source: toml::de::Error },
}

/// Per-record failure while turning a JSON payload into a [`Record`].
///
/// [`Record`]: crate::record::Record
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DecodeError {
    #[snafu(display("Failed to parse payload as a JSON object: {}", reason))]
    MalformedPayload { reason: String },

    #[snafu(display("Logger {:?} has to be named +.Type+", logger))]
    MalformedLoggerName { logger: String },

    #[snafu(display("Invalid timestamp in {:?}: {}", key, reason))]
    InvalidTimestamp { key: String, reason: String },

    #[snafu(display("time_key {:?} was not found", key))]
    MissingTimeKey { key: String },

    #[snafu(display("Unsupported JSON decode type: {}: {}", key, kind))]
    UnsupportedValueType { key: String, kind: &'static str },

    #[snafu(display("Field names must not be empty"))]
    EmptyFieldName,

    #[snafu(display("More than one timestamp in payload, last one from {:?}", key))]
    DuplicateTimestamp { key: String },
}

impl DecodeError {
    /// Label used for the `error_type` of internal events.
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::MalformedLoggerName { .. } => "malformed_logger_name",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
            Self::MissingTimeKey { .. } => "missing_time_key",
            Self::UnsupportedValueType { .. } => "unsupported_value_type",
            Self::EmptyFieldName => "empty_field_name",
            Self::DuplicateTimestamp { .. } => "duplicate_timestamp",
        }
    }

    pub(crate) fn invalid_timestamp(key: &str, error: &datetime::ParseError) -> Self {
        Self::InvalidTimestamp {
            key: key.to_owned(),
            reason: error.to_string(),
        }
    }
}

/// Per-record failure while writing line protocol.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EncodeError {
    #[snafu(display("Unsupported field type: {}: {}", field, kind))]
    UnsupportedFieldType { field: String, kind: &'static str },

    #[snafu(display("More than one value: {}", field))]
    MultipleValuesForField { field: String },

    #[snafu(display("Record from logger {:?} has no type", logger))]
    MissingRecordType { logger: String },

    #[snafu(display("Record from logger {:?} has no timestamp", logger))]
    MissingTimestamp { logger: String },

    #[snafu(display("Record from logger {:?} has no fields", logger))]
    NoFields { logger: String },

    #[snafu(
        display("Field names must not be empty"),
        context(suffix(EncodeSnafu))
    )]
    EmptyFieldName,

    #[snafu(display("I/O error while writing frame: {}", source))]
    Io { source: std::io::Error },
}

impl EncodeError {
    /// Label used for the `error_type` of internal events.
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::UnsupportedFieldType { .. } => "unsupported_field_type",
            Self::MultipleValuesForField { .. } => "multiple_values_for_field",
            Self::MissingRecordType { .. } => "missing_record_type",
            Self::MissingTimestamp { .. } => "missing_timestamp",
            Self::NoFields { .. } => "no_fields",
            Self::EmptyFieldName => "empty_field_name",
            Self::Io { .. } => "io_failed",
        }
    }
}

// Required by `tokio_util::codec::Encoder`.
impl From<std::io::Error> for EncodeError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

/// Any error surfaced by the crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{}", source), context(false))]
    Config { source: ConfigError },

    #[snafu(display("{}", source), context(false))]
    Decode { source: DecodeError },

    #[snafu(display("{}", source), context(false))]
    Encode { source: EncodeError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
