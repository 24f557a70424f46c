use std::collections::HashSet;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tokio_util::codec::Encoder;

use super::TimestampPrecision;
use crate::{
    error::EncodeError,
    escape::{write_key, write_measurement, write_string_value},
    record::{Field, Record, Value},
};

/// Config used to build an [`InfluxdbEncoder`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InfluxdbEncoderConfig {
    /// Unit of the timestamp written at the end of each line.
    ///
    /// One of `ns`, `us`, `ms`, `s`, `m` or `h`. Any other value fails when the
    /// configuration is loaded.
    #[serde(default)]
    pub timestamp_precision: TimestampPrecision,
}

impl InfluxdbEncoderConfig {
    pub const fn new(timestamp_precision: TimestampPrecision) -> Self {
        Self {
            timestamp_precision,
        }
    }

    /// Build the `InfluxdbEncoder` from this configuration.
    pub const fn build(&self) -> InfluxdbEncoder {
        InfluxdbEncoder::new(self.timestamp_precision)
    }
}

/// Writes one [`Record`] as one line of InfluxDB line protocol:
///
/// ```text
/// <type>,Logger=<logger> <key>=<value>[,<key>=<value>...] <timestamp>\n
/// ```
///
/// <https://docs.influxdata.com/influxdb/latest/reference/syntax/line-protocol/>
#[derive(Clone, Copy, Debug, Default)]
pub struct InfluxdbEncoder {
    precision: TimestampPrecision,
}

impl InfluxdbEncoder {
    pub const fn new(precision: TimestampPrecision) -> Self {
        Self { precision }
    }

    pub const fn precision(&self) -> TimestampPrecision {
        self.precision
    }

    /// Encodes `record` into a fresh buffer.
    pub fn encode(&self, record: &Record) -> Result<Bytes, EncodeError> {
        let mut output = BytesMut::with_capacity(64 + record.fields.len() * 16);
        self.write_record(record, &mut output)?;
        Ok(output.freeze())
    }

    /// Appends the encoded `record` to `output`.
    ///
    /// On error `output` is left exactly as it was.
    pub fn write_record(&self, record: &Record, output: &mut BytesMut) -> Result<(), EncodeError> {
        let original_len = output.len();
        let result = self.write_line(record, output);
        if result.is_err() {
            output.truncate(original_len);
        }
        result
    }

    fn write_line(&self, record: &Record, output: &mut BytesMut) -> Result<(), EncodeError> {
        if record.record_type.is_empty() {
            return Err(EncodeError::MissingRecordType {
                logger: record.logger.clone(),
            });
        }
        if !record.has_timestamp() {
            return Err(EncodeError::MissingTimestamp {
                logger: record.logger.clone(),
            });
        }
        // LineProtocol should have a field
        if record.fields.is_empty() {
            return Err(EncodeError::NoFields {
                logger: record.logger.clone(),
            });
        }

        write_measurement(&record.record_type, output);

        // a tag with an empty value is rejected by the server
        if !record.logger.is_empty() {
            output.put_slice(b",Logger=");
            write_key(&record.logger, output);
        }
        output.put_u8(b' ');

        encode_fields(&record.fields, output)?;
        output.put_u8(b' ');

        output.put_slice(self.precision.convert(record.timestamp).to_string().as_bytes());
        output.put_u8(b'\n');
        Ok(())
    }
}

impl Encoder<Record> for InfluxdbEncoder {
    type Error = EncodeError;

    fn encode(&mut self, record: Record, buffer: &mut BytesMut) -> Result<(), Self::Error> {
        self.write_record(&record, buffer)
    }
}

fn encode_fields(fields: &[Field], output: &mut BytesMut) -> Result<(), EncodeError> {
    let mut seen = HashSet::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        if field.name.is_empty() {
            return Err(EncodeError::EmptyFieldName);
        }
        if !seen.insert(field.name.as_str()) {
            return Err(EncodeError::MultipleValuesForField {
                field: field.name.clone(),
            });
        }

        if index > 0 {
            output.put_u8(b',');
        }
        write_key(&field.name, output);
        output.put_u8(b'=');
        encode_value(field, output)?;
    }

    Ok(())
}

fn encode_value(field: &Field, output: &mut BytesMut) -> Result<(), EncodeError> {
    match &field.value {
        Value::Integer(i) => {
            output.put_slice(i.to_string().as_bytes());
            output.put_u8(b'i');
        }
        // `Display` for f64 is the shortest representation that round-trips
        // and never uses an exponent.
        Value::Double(f) if f.is_finite() => output.put_slice(f.to_string().as_bytes()),
        Value::Double(_) => {
            return Err(EncodeError::UnsupportedFieldType {
                field: field.name.clone(),
                kind: "non-finite double",
            });
        }
        Value::Boolean(b) => output.put_slice(b.to_string().as_bytes()),
        Value::String(s) => {
            output.put_u8(b'"');
            write_string_value(s, output);
            output.put_u8(b'"');
        }
        Value::Bytes(_) => {
            return Err(EncodeError::UnsupportedFieldType {
                field: field.name.clone(),
                kind: field.value.kind(),
            });
        }
    }
    Ok(())
}
