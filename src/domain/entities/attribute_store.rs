//! Attribute point allocations

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::errors::CharacterError;
use crate::domain::value_objects::{ability_modifier, Catalog};

/// An attribute value that actually moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub attribute: String,
    pub previous: u32,
    pub current: u32,
}

/// Owns one value per catalog attribute and the running total of them
///
/// `total_points` is maintained incrementally and always equals the sum of
/// the values; tests recount it with `check_total`.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    catalog: Arc<Catalog>,
    values: Vec<u32>,
    total_points: u64,
}

impl AttributeStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let values = vec![0; catalog.attributes.len()];
        Self {
            catalog,
            values,
            total_points: 0,
        }
    }

    /// Populate from a name → value map; names missing from the map are 0
    pub fn from_values(catalog: Arc<Catalog>, values: &BTreeMap<String, u32>) -> Self {
        let values: Vec<u32> = catalog
            .attributes
            .iter()
            .map(|name| values.get(name).copied().unwrap_or(0))
            .collect();
        let total_points = values.iter().map(|v| u64::from(*v)).sum();
        Self {
            catalog,
            values,
            total_points,
        }
    }

    /// Apply `delta` to an attribute, flooring at zero
    ///
    /// Returns `None` when the clamped value equals the current one; in that
    /// case nothing, including the total, is touched.
    pub fn adjust(&mut self, name: &str, delta: i64) -> Result<Option<AttributeChange>, CharacterError> {
        let index = self
            .catalog
            .attribute_index(name)
            .ok_or_else(|| CharacterError::UnknownAttribute(name.to_string()))?;

        let previous = self.values[index];
        let current = clamp_count(i64::from(previous).saturating_add(delta));
        if current == previous {
            return Ok(None);
        }

        self.values[index] = current;
        self.total_points = self.total_points - u64::from(previous) + u64::from(current);

        Ok(Some(AttributeChange {
            attribute: name.to_string(),
            previous,
            current,
        }))
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.catalog.attribute_index(name).map(|i| self.values[i])
    }

    pub fn modifier(&self, name: &str) -> Option<i32> {
        self.get(name).map(ability_modifier)
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    /// Whether the incremental total still matches a full recount
    #[cfg(test)]
    pub fn check_total(&self) -> bool {
        self.total_points == self.values.iter().map(|v| u64::from(*v)).sum::<u64>()
    }

    /// Values in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.catalog
            .attributes
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn to_map(&self) -> BTreeMap<String, u32> {
        self.iter().map(|(name, value)| (name.to_string(), value)).collect()
    }
}

pub(crate) fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AttributeStore {
        AttributeStore::new(Arc::new(Catalog::standard()))
    }

    #[test]
    fn test_adjust_tracks_total() {
        let mut store = store();

        store.adjust("Strength", 1).unwrap();
        store.adjust("Strength", 1).unwrap();
        store.adjust("Wisdom", 5).unwrap();
        store.adjust("Strength", -1).unwrap();

        assert_eq!(store.get("Strength"), Some(1));
        assert_eq!(store.get("Wisdom"), Some(5));
        assert_eq!(store.total_points(), 6);
        assert!(store.check_total());
    }

    #[test]
    fn test_decrement_at_zero_is_a_no_op() {
        let mut store = store();
        let before = store.to_map();

        let change = store.adjust("Charisma", -1).unwrap();

        assert_eq!(change, None);
        assert_eq!(store.to_map(), before);
        assert_eq!(store.total_points(), 0);
    }

    #[test]
    fn test_large_negative_delta_clamps_and_keeps_total_exact() {
        let mut store = store();
        store.adjust("Dexterity", 3).unwrap();
        store.adjust("Constitution", 4).unwrap();

        let change = store.adjust("Dexterity", -10).unwrap().unwrap();

        assert_eq!(change.previous, 3);
        assert_eq!(change.current, 0);
        assert_eq!(store.total_points(), 4);
        assert!(store.check_total());
    }

    #[test]
    fn test_unknown_attribute_is_an_error() {
        let mut store = store();
        assert_eq!(
            store.adjust("Luck", 1),
            Err(CharacterError::UnknownAttribute("Luck".to_string()))
        );
    }

    #[test]
    fn test_from_values_computes_total() {
        let catalog = Arc::new(Catalog::standard());
        let values = BTreeMap::from([("Strength".to_string(), 12), ("Intelligence".to_string(), 8)]);

        let store = AttributeStore::from_values(catalog, &values);

        assert_eq!(store.total_points(), 20);
        assert_eq!(store.get("Dexterity"), Some(0));
        assert_eq!(store.modifier("Intelligence"), Some(-1));
        assert_eq!(store.iter().next(), Some(("Strength", 12)));
    }
}
