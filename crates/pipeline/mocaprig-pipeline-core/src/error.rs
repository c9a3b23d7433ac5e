use thiserror::Error;

/// Fatal pipeline failures. All of these surface at setup; the per-frame loop
/// only reports detector faults, never mapping problems.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Unknown capture-target or consumer key. Not recoverable.
    #[error("unknown configuration key '{0}'")]
    Configuration(String),

    /// The capture source could not be opened.
    #[error("failed to open capture source: {0}")]
    CaptureOpen(#[from] std::io::Error),

    /// Detection backend fault (model init, frame decode).
    #[error("detector failure: {0}")]
    Detector(String),
}
