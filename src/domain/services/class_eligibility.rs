//! Class eligibility against current attributes
//!
//! Advisory only: selection never consults this.

use crate::domain::entities::AttributeStore;
use crate::domain::value_objects::ClassDefinition;

/// True iff every attribute the class names meets its minimum
///
/// Attributes the class does not mention impose nothing.
pub fn is_eligible(class: &ClassDefinition, attributes: &AttributeStore) -> bool {
    class
        .requirements
        .iter()
        .all(|(attribute, minimum)| attributes.get(attribute).unwrap_or(0) >= *minimum)
}
