/// humon_service: weather station humidity run monitoring.
///
/// Flags sustained elevated relative humidity (readings inside the 90–95%
/// band for several consecutive hours) and prepares the classified series
/// for display.
///
/// # Module structure
///
/// ```text
/// humon_service
/// ├── model     - shared data types (Reading, Band, Run, Segment, Severity)
/// ├── config    - segmentation settings loader (humon.toml)
/// ├── logging   - env_logger setup for binaries
/// ├── ingest
/// │   ├── readings - station CSV parsing, daily-file consolidation, sorting
/// │   └── fixtures (test only) - representative station exports
/// ├── filter    - year / month / ISO week selection ahead of segmentation
/// ├── analysis
/// │   ├── runs     - run-length encoding and run detection
/// │   ├── severity - length → severity table
/// │   └── segments - segment building and point labels
/// ├── chart     - colored traces and figure metadata for the front end
/// └── endpoint  - JSON HTTP API over a loaded series
/// ```

/// Public modules
pub mod analysis;
pub mod chart;
pub mod config;
pub mod endpoint;
pub mod filter;
pub mod ingest;
pub mod logging;
pub mod model;
