pub mod adafruit_io;
pub mod diagnostics;
pub mod thingspeak;

pub use adafruit_io::AdafruitIoUploader;
pub use diagnostics::{DiagnosticSink, LogSink, MemorySink, Scope, UploadEvent};
pub use thingspeak::ThingSpeakUploader;

use crate::models::SensorData;

/// Capability every backend adapter implements. The reporting loop holds a
/// list of these and drives them uniformly once per interval.
pub trait Uploader {
    /// One-time setup (resolve remote handles, bind the transport). Safe to
    /// call once before any upload; repeat calls must not crash.
    fn begin(&mut self);

    /// Per-cycle housekeeping on an already-established connection.
    /// Defaults to doing nothing.
    fn run(&mut self) {}

    /// Send whatever subset of `data` is valid. Never fails the caller:
    /// outcomes surface only through the adapter's diagnostic sink.
    fn upload_data(&mut self, data: &SensorData);
}

/// The set of uploaders the reporting loop broadcasts to.
pub type UploaderList = Vec<Box<dyn Uploader + Send>>;
