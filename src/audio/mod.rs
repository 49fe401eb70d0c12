//! Audio server side of the pipeline: source lookup and recording.

pub mod recorder;
pub mod source;

pub use recorder::{record, RecordingOutcome};
pub use source::resolve_source;
