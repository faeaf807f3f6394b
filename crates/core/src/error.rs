/// Errors surfaced at the command boundary.
///
/// Unknown ids are deliberately absent: mutations against a missing entity
/// are silent no-ops, so the only rejection is invalid input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Reject text that is empty after trimming.
///
/// `field` names the offending input in the error message, e.g. `"title"`.
pub fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
