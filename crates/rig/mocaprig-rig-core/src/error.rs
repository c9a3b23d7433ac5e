use thiserror::Error;

/// Fatal rig-side setup failures. Everything that can go wrong after
/// construction (missing providers, missing bones, already-assigned bindings)
/// is handled as a logged skip instead.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("armature '{0}' not found in scene")]
    MissingArmature(String),
}
