//! Simulated diagnostics: progress phases and canned verdicts.

pub mod pipeline;
/// Asset handoff from the grid view.
pub mod target;
pub mod verdict;

pub use pipeline::{DiagnosticsRun, Phase, Progress, standard_phases};
pub use target::{request_diagnosis, take_target};
pub use verdict::{Correlation, DiagnosticRequest, Severity, Verdict};
