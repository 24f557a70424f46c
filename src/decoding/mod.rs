//! Decoders turning one JSON payload plus a logger name into records.

mod heuristic;
mod json;
mod logger;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use self::heuristic::{
    HeuristicJsonDecoderConfig, TIMESTAMP_FIELD, TIMESTAMP_KEYS, TIMESTAMP_LAYOUT, TimestampPolicy,
};
pub use self::json::{JsonDecoder, JsonDecoderConfig, TimestampStrategy};
pub use self::logger::{LoggerTypeResolver, Segment};
use crate::{
    error::{ConfigError, DecodeError},
    record::Record,
};

/// Parse structured records from bytes.
pub trait Deserializer: std::fmt::Debug + Send + Sync {
    /// Parses records from `bytes` received from `logger`.
    ///
    /// A failure discards the whole payload; no records are returned for it.
    fn parse(&self, logger: &str, bytes: Bytes) -> Result<SmallVec<[Record; 1]>, DecodeError>;
}

/// Configures how payloads are decoded, selected by the `codec` key.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "codec", rename_all = "snake_case")]
pub enum DecoderConfig {
    /// Timestamp read from a configured key with a configured layout.
    Json(JsonDecoderConfig),

    /// Field types and timestamps inferred from string contents.
    HeuristicJson(HeuristicJsonDecoderConfig),
}

impl From<JsonDecoderConfig> for DecoderConfig {
    fn from(config: JsonDecoderConfig) -> Self {
        Self::Json(config)
    }
}

impl From<HeuristicJsonDecoderConfig> for DecoderConfig {
    fn from(config: HeuristicJsonDecoderConfig) -> Self {
        Self::HeuristicJson(config)
    }
}

impl DecoderConfig {
    /// Build the `JsonDecoder` from this configuration.
    pub fn build(&self) -> Result<JsonDecoder, ConfigError> {
        match self {
            Self::Json(config) => config.build(),
            Self::HeuristicJson(config) => config.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn codec_tag_selects_decoder() {
        let config: DecoderConfig = toml::from_str(indoc! {r#"
            codec = "json"
            time_key = "time"
            time_layout = "%Y-%m-%dT%H:%M:%S"
        "#})
        .unwrap();
        assert_eq!(config.build().unwrap().codec_name(), "json");

        let config: DecoderConfig = toml::from_str(r#"codec = "heuristic_json""#).unwrap();
        assert_eq!(config.build().unwrap().codec_name(), "heuristic_json");
    }

    #[test]
    fn unknown_codec() {
        assert!(toml::from_str::<DecoderConfig>(r#"codec = "xml""#).is_err());
    }

    #[test]
    fn configured_codec_requires_time_key() {
        let config: DecoderConfig = toml::from_str(r#"codec = "json""#).unwrap();
        assert!(matches!(
            config.build(),
            Err(ConfigError::TimeKeyUndefined)
        ));
    }

    #[test]
    fn decoders_are_shareable() {
        fn assert_shareable<T: Deserializer + Clone + 'static>() {}
        assert_shareable::<JsonDecoder>();
    }
}
