//! Encoding of [`Record`]s into InfluxDB line protocol.
//!
//! [`Record`]: crate::record::Record

mod influxdb;
mod precision;

pub use influxdb::{InfluxdbEncoder, InfluxdbEncoderConfig};
pub use precision::TimestampPrecision;
