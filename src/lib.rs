//! Record transcoding: loosely structured JSON payloads in, InfluxDB line
//! protocol out.
//!
//! A [`decoding::JsonDecoder`] turns one JSON object and the name of the
//! logger that produced it into a typed [`record::Record`]; the
//! [`encoding::InfluxdbEncoder`] writes that record as one line. A
//! [`transcoder::Transcoder`] does both from a single TOML configuration and
//! reports each step through [`internal_events`].

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
extern crate tracing;

#[macro_use]
pub mod internal_events;

pub mod datetime;
pub mod decoding;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod record;
pub mod transcoder;

pub use self::{
    error::{Error, Result},
    record::{Field, Record, Value},
    transcoder::{Transcoder, TranscoderConfig},
};
