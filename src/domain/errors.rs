//! Domain errors

/// A name that does not resolve against the catalog
///
/// Point arithmetic never fails; clamping and no-ops cover every numeric
/// edge. Only lookups by name can be wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharacterError {
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),
    #[error("Unknown class: {0}")]
    UnknownClass(String),
}
