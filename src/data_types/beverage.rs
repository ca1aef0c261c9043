use std::fmt::Display;

use serde_derive::{Deserialize, Serialize};

use super::common::{DocumentId, Entity, Identifiable, ENTITY_IS_NOT_SAVED};

fn not_saved() -> DocumentId {
    ENTITY_IS_NOT_SAVED
}

/// A reusable hydration container, e.g. a bottle or a soft flask.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TourBeverageContainer {
    #[serde(rename = "_id", default = "not_saved")]
    pub container_id: DocumentId,
    pub name: String,
    /// Liters
    pub capacity: f32,
}

impl TourBeverageContainer {
    pub fn new(name: impl Into<String>, capacity: f32) -> Self {
        Self {
            container_id: ENTITY_IS_NOT_SAVED,
            name: name.into(),
            capacity,
        }
    }
}

impl Identifiable for TourBeverageContainer {
    fn as_i64(&self) -> DocumentId {
        self.container_id
    }
}

impl Entity for TourBeverageContainer {
    const COLL_NAME: &'static str = "beverage_containers";

    fn set_id(&mut self, id: DocumentId) {
        self.container_id = id;
    }
}

impl PartialEq for TourBeverageContainer {
    fn eq(&self, other: &Self) -> bool {
        if self.is_saved() || other.is_saved() {
            return self.container_id == other.container_id;
        }

        self.name == other.name && self.capacity == other.capacity
    }
}

impl Display for TourBeverageContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} L)", self.name, self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_container_is_not_saved() {
        let container = TourBeverageContainer::new("Bottle", 0.75);

        assert!(!container.is_saved());
        assert_eq!(container.to_string(), "Bottle (0.75 L)");
    }

    #[test]
    fn saved_containers_compare_by_identity() {
        let mut first = TourBeverageContainer::new("Bottle", 0.5);
        let mut second = TourBeverageContainer::new("Flask", 0.25);
        first.set_id(3);
        second.set_id(3);

        assert_eq!(first, second);
        assert_ne!(first, TourBeverageContainer::new("Bottle", 0.5));
        assert_eq!(
            TourBeverageContainer::new("Bottle", 0.5),
            TourBeverageContainer::new("Bottle", 0.5)
        );
    }

    #[test]
    fn missing_id_deserializes_as_not_saved() {
        let container: TourBeverageContainer =
            serde_json::from_str(r#"{"name": "Bottle", "capacity": 0.6}"#).unwrap();

        assert_eq!(container.container_id, ENTITY_IS_NOT_SAVED);
    }
}
