use metrics::counter;

use super::{InternalEvent, error_stage, error_type};
use crate::error::EncodeError;

#[derive(Debug)]
pub struct RecordEncoded<'a> {
    pub record_type: &'a str,
    pub byte_size: usize,
}

impl InternalEvent for RecordEncoded<'_> {
    fn emit(self) {
        trace!(
            message = "Encoded record.",
            record_type = self.record_type,
            byte_size = self.byte_size,
        );
        counter!("component_sent_events_total").increment(1);
        counter!("component_sent_event_bytes_total").increment(self.byte_size as u64);
    }

    fn name(&self) -> Option<&'static str> {
        Some("RecordEncoded")
    }
}

#[derive(Debug)]
pub struct InfluxdbEncodingError<'a> {
    pub error: &'a EncodeError,
    pub logger: &'a str,
}

impl InternalEvent for InfluxdbEncodingError<'_> {
    fn emit(self) {
        let reason = "Failed to encode record.";
        error!(
            message = reason,
            logger = self.logger,
            error = %self.error,
            error_code = self.error.error_type(),
            error_type = error_type::ENCODER_FAILED,
            stage = error_stage::PROCESSING,
        );
        counter!(
            "component_errors_total",
            "error_code" => self.error.error_type(),
            "error_type" => error_type::ENCODER_FAILED,
            "stage" => error_stage::PROCESSING,
        )
        .increment(1);
        counter!(
            "component_discarded_events_total",
            "intentional" => "false",
        )
        .increment(1);
    }

    fn name(&self) -> Option<&'static str> {
        Some("InfluxdbEncodingError")
    }
}
