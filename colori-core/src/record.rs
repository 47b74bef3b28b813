//! Records of training metrics.
//!
//! An optimization step reports its loss components as a [`Record`],
//! a small key-value container of [`RecordValue`]s. The [`Recorder`]
//! trait is the seam towards whatever sink the deployment uses;
//! [`NullRecorder`] discards everything and is handy in tests.
mod base;
mod recorder;
pub use base::{Record, RecordValue};
pub use recorder::{NullRecorder, Recorder};
