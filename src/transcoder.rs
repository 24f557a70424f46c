use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{
    decoding::{DecoderConfig, JsonDecoder},
    encoding::{InfluxdbEncoder, InfluxdbEncoderConfig},
    error::{ConfigError, Error, TomlSnafu},
    internal_events::{DecoderError, InfluxdbEncodingError, RecordDecoded, RecordEncoded},
};

/// A decoder and the encoder its records are written with.
///
/// ```toml
/// [decoder]
/// codec = "json"
/// time_key = "time"
/// time_layout = "%Y-%m-%dT%H:%M:%S"
///
/// [encoder]
/// timestamp_precision = "ms"
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TranscoderConfig {
    pub decoder: DecoderConfig,

    #[serde(default)]
    pub encoder: InfluxdbEncoderConfig,
}

impl TranscoderConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).context(TomlSnafu)
    }

    /// Build the `Transcoder` from this configuration.
    pub fn build(&self) -> Result<Transcoder, ConfigError> {
        Ok(Transcoder::new(self.decoder.build()?, self.encoder.build()))
    }
}

/// Turns a JSON payload into one line of line protocol, reporting every
/// record and every failure as an internal event.
#[derive(Clone, Debug)]
pub struct Transcoder {
    decoder: JsonDecoder,
    encoder: InfluxdbEncoder,
}

impl Transcoder {
    pub const fn new(decoder: JsonDecoder, encoder: InfluxdbEncoder) -> Self {
        Self { decoder, encoder }
    }

    pub const fn decoder(&self) -> &JsonDecoder {
        &self.decoder
    }

    pub const fn encoder(&self) -> &InfluxdbEncoder {
        &self.encoder
    }

    pub fn transcode(&self, logger: &str, payload: &[u8]) -> Result<Bytes, Error> {
        let mut output = BytesMut::new();
        self.transcode_into(logger, payload, &mut output)?;
        Ok(output.freeze())
    }

    /// Appends the line for `payload` to `output`. On error nothing is
    /// appended.
    pub fn transcode_into(
        &self,
        logger: &str,
        payload: &[u8],
        output: &mut BytesMut,
    ) -> Result<(), Error> {
        let codec = self.decoder.codec_name();

        let record = match self.decoder.decode(logger, payload) {
            Ok(record) => record,
            Err(error) => {
                emit!(DecoderError {
                    codec,
                    logger,
                    error: &error,
                });
                return Err(error.into());
            }
        };
        emit!(RecordDecoded {
            codec,
            logger,
            field_count: record.fields.len(),
            byte_size: payload.len(),
        });

        let start = output.len();
        if let Err(error) = self.encoder.write_record(&record, output) {
            emit!(InfluxdbEncodingError {
                error: &error,
                logger,
            });
            return Err(error.into());
        }
        emit!(RecordEncoded {
            record_type: &record.record_type,
            byte_size: output.len() - start,
        });

        Ok(())
    }
}
