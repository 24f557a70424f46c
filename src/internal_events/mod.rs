//! Structured log lines and metrics emitted while transcoding.
//!
//! Each event is a struct implementing [`InternalEvent`]; emitting it writes
//! the `tracing` event and bumps the `metrics` counters in one place so call
//! sites stay a single `emit!` line. Installing a subscriber or a metrics
//! recorder is left to the host process.

pub trait InternalEvent: Sized {
    fn emit(self);

    fn name(&self) -> Option<&'static str> {
        None
    }
}

pub fn emit(event: impl InternalEvent) {
    event.emit();
}

#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::internal_events::emit($event)
    };
}

// Modules that require emit! macro so they need to be defined after the macro.
mod decoder;
mod influxdb;
mod prelude;

pub use self::decoder::*;
pub use self::influxdb::*;
pub use self::prelude::{error_stage, error_type};
