//! Recorder seam for metric sinks.
use super::Record;

/// Writes records to some sink (a log file, a metrics service, ...).
pub trait Recorder {
    /// Writes a record produced at the given optimization step.
    fn write(&mut self, opt_step: usize, record: Record);
}

/// A recorder that discards all records.
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn write(&mut self, _opt_step: usize, _record: Record) {}
}
