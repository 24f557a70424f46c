use metrics::counter;

use super::{InternalEvent, error_stage, error_type};
use crate::error::DecodeError;

#[derive(Debug)]
pub struct RecordDecoded<'a> {
    pub codec: &'static str,
    pub logger: &'a str,
    pub field_count: usize,
    pub byte_size: usize,
}

impl InternalEvent for RecordDecoded<'_> {
    fn emit(self) {
        trace!(
            message = "Decoded record.",
            codec = self.codec,
            logger = self.logger,
            field_count = self.field_count,
            byte_size = self.byte_size,
        );
        counter!("component_received_events_total", "codec" => self.codec).increment(1);
        counter!("component_received_event_bytes_total", "codec" => self.codec)
            .increment(self.byte_size as u64);
    }

    fn name(&self) -> Option<&'static str> {
        Some("RecordDecoded")
    }
}

#[derive(Debug)]
pub struct DecoderError<'a> {
    pub codec: &'static str,
    pub logger: &'a str,
    pub error: &'a DecodeError,
}

impl InternalEvent for DecoderError<'_> {
    fn emit(self) {
        warn!(
            message = "Failed decoding record.",
            codec = self.codec,
            logger = self.logger,
            error = %self.error,
            error_code = self.error.error_type(),
            error_type = error_type::PARSER_FAILED,
            stage = error_stage::PROCESSING,
        );
        counter!(
            "component_errors_total",
            "codec" => self.codec,
            "error_code" => self.error.error_type(),
            "error_type" => error_type::PARSER_FAILED,
            "stage" => error_stage::PROCESSING,
        )
        .increment(1);
    }

    fn name(&self) -> Option<&'static str> {
        Some("DecoderError")
    }
}
