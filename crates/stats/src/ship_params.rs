use std::collections::HashMap;

use wri_model::ShipClass;

/// Ship-id -> ship-class side table. Constructed once at process start and
/// passed down by reference (spec.md §9: "promote to explicit immutable
/// value objects"), never a lazily-populated global cache.
pub trait ShipParamsProvider: Send + Sync {
    fn ship_class(&self, ship_id: i64) -> Option<ShipClass>;
}

pub struct StaticShipParamsTable {
    classes: HashMap<i64, ShipClass>,
}

impl StaticShipParamsTable {
    pub fn new(classes: HashMap<i64, ShipClass>) -> Self {
        Self { classes }
    }

    /// A small built-in sample sufficient for tests and local development;
    /// a production deployment constructs this from the game's param dump
    /// instead (out of this core's scope -- it is external game data, not
    /// replay data).
    pub fn sample() -> Self {
        let mut classes = HashMap::new();
        classes.insert(100, ShipClass::Destroyer);
        classes.insert(200, ShipClass::Destroyer);
        classes.insert(300, ShipClass::Cruiser);
        classes.insert(400, ShipClass::Battleship);
        classes.insert(500, ShipClass::AirCarrier);
        classes.insert(600, ShipClass::Submarine);
        classes.insert(700, ShipClass::Auxiliary);
        Self::new(classes)
    }
}

impl ShipParamsProvider for StaticShipParamsTable {
    fn ship_class(&self, ship_id: i64) -> Option<ShipClass> {
        self.classes.get(&ship_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_ship_ids() {
        let table = StaticShipParamsTable::sample();
        assert_eq!(table.ship_class(300), Some(ShipClass::Cruiser));
        assert_eq!(table.ship_class(999), None);
    }
}
