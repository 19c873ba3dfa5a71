//! Compatibility rules between a list's element type and the children offered to it.
use super::types::Type;
use crate::graph::error::GraphError;

/// A candidate fits a slot only when it resolves to exactly the element type.
/// A `Nil` element type accepts nothing.
pub fn is_compatible(element: Type, candidate: Type) -> bool {
    element != Type::Nil && element == candidate
}

pub fn ensure_compatible(element: Type, candidate: Type) -> Result<(), GraphError> {
    if is_compatible(element, candidate) {
        Ok(())
    } else {
        Err(GraphError::TypeMismatch { expected: element, found: candidate })
    }
}

/// Checks a whole batch before anything is committed.
/// Returns the position and error of the first incompatible candidate.
pub fn ensure_all_compatible(
    element: Type,
    candidates: impl IntoIterator<Item = Type>,
) -> Result<(), (usize, GraphError)> {
    for (pos, candidate) in candidates.into_iter().enumerate() {
        ensure_compatible(element, candidate).map_err(|e| (pos, e))?;
    }
    Ok(())
}
