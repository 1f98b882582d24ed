/// Humidity run analysis: the segmentation engine.
///
/// Submodules:
/// - `runs`     - run-length encoding and qualifying run detection.
/// - `severity` - length → severity table and classification.
/// - `segments` - segment building, merging and point labels.
///
/// Everything here is pure: no I/O, no retained state.

pub mod runs;
pub mod segments;
pub mod severity;

pub use runs::{Stretch, detect_runs, run_length_encode};
pub use segments::{
    SegmentationConfig, build_segments, build_segments_with, label_elapsed_hours,
    label_humidity_values,
};
pub use severity::{DEFAULT_SEVERITY_RULES, SeverityRule, classify, classify_length};
