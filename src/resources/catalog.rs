//! Unit archetype catalog.
//!
//! The [`UnitCatalog`] resource is a read-only table of [`UnitArchetype`]s
//! keyed by type name. It is consulted at spawn time only; spawned units copy
//! the stats they need, so archetype values are never mutated by combat.
//!
//! # JSON Format
//!
//! An alternate table can be loaded with [`UnitCatalog::from_json_str`]:
//!
//! ```json
//! {
//!   "basic": { "color": 65280, "hp": 10, "damage": 2, "speed": 0.3,
//!              "attack_cooldown": 1.0, "cost": 20, "reward": 25 },
//!   "ranged": { "color": 255, "hp": 8, "damage": 3, "speed": 0.25,
//!               "attack_cooldown": 1.5, "range": 10.0, "cost": 30, "reward": 35 }
//! }
//! ```

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Static template a unit is instantiated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitArchetype {
    /// RGB color hint for the renderer.
    pub color: u32,
    /// Starting and maximum hit points.
    pub hp: i32,
    /// Damage dealt per exchange or base attack.
    pub damage: i32,
    /// Base speed in world units per 1/60 s, before jitter.
    pub speed: f32,
    /// Seconds between base attacks.
    pub attack_cooldown: f32,
    /// Attack range. Units without one get `DEFAULT_RANGE`.
    #[serde(default)]
    pub range: Option<f32>,
    /// Price paid by the player to buy one.
    pub cost: u32,
    /// Money awarded to the player when one of these dies as an enemy.
    pub reward: u32,
}

impl UnitArchetype {
    /// Reject stats a live unit could not run with.
    fn validate(&self, kind: &str) -> Result<(), SimError> {
        let bad = |field: &str, value: String| {
            Err(SimError::Catalog(format!("{}: invalid {} {}", kind, field, value)))
        };
        if self.hp <= 0 {
            return bad("hp", self.hp.to_string());
        }
        if self.damage < 0 {
            return bad("damage", self.damage.to_string());
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return bad("speed", self.speed.to_string());
        }
        if !self.attack_cooldown.is_finite() || self.attack_cooldown < 0.0 {
            return bad("attack_cooldown", self.attack_cooldown.to_string());
        }
        if let Some(range) = self.range
            && (!range.is_finite() || range < 0.0)
        {
            return bad("range", range.to_string());
        }
        Ok(())
    }
}

/// Range assigned to units whose archetype does not declare one.
pub const DEFAULT_RANGE: f32 = 1.0;

#[derive(Resource, Debug, Clone)]
pub struct UnitCatalog {
    archetypes: BTreeMap<String, UnitArchetype>,
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl UnitCatalog {
    /// The stock table: `basic`, `ranged` and `heavy`.
    pub fn builtin() -> Self {
        let mut archetypes = BTreeMap::new();
        archetypes.insert(
            "basic".to_string(),
            UnitArchetype {
                color: 0x00ff00,
                hp: 10,
                damage: 2,
                speed: 0.3,
                attack_cooldown: 1.0,
                range: None,
                cost: 20,
                reward: 25,
            },
        );
        archetypes.insert(
            "ranged".to_string(),
            UnitArchetype {
                color: 0x0000ff,
                hp: 8,
                damage: 3,
                speed: 0.25,
                attack_cooldown: 1.5,
                range: Some(10.0),
                cost: 30,
                reward: 35,
            },
        );
        archetypes.insert(
            "heavy".to_string(),
            UnitArchetype {
                color: 0xffff00,
                hp: 20,
                damage: 4,
                speed: 0.15,
                attack_cooldown: 2.0,
                range: None,
                cost: 60,
                reward: 70,
            },
        );
        Self { archetypes }
    }

    /// Parse a catalog from a JSON object keyed by type name.
    ///
    /// Every archetype needs positive `hp` and non-negative, finite
    /// `damage`, `speed`, `attack_cooldown` and `range`.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let archetypes: BTreeMap<String, UnitArchetype> =
            serde_json::from_str(json).map_err(|e| SimError::Catalog(e.to_string()))?;
        if archetypes.is_empty() {
            return Err(SimError::Catalog("catalog has no unit types".into()));
        }
        for (kind, archetype) in &archetypes {
            archetype.validate(kind)?;
        }
        Ok(Self { archetypes })
    }

    pub fn lookup(&self, kind: &str) -> Result<&UnitArchetype, SimError> {
        self.archetypes
            .get(kind)
            .ok_or_else(|| SimError::UnknownUnitType(kind.to_string()))
    }

    /// Known type names, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.archetypes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rewards_match_table() {
        let catalog = UnitCatalog::builtin();
        assert_eq!(catalog.lookup("basic").unwrap().reward, 25);
        assert_eq!(catalog.lookup("ranged").unwrap().reward, 35);
        assert_eq!(catalog.lookup("heavy").unwrap().reward, 70);
    }

    #[test]
    fn only_ranged_declares_a_range() {
        let catalog = UnitCatalog::builtin();
        assert_eq!(catalog.lookup("ranged").unwrap().range, Some(10.0));
        assert_eq!(catalog.lookup("basic").unwrap().range, None);
        assert_eq!(catalog.lookup("heavy").unwrap().range, None);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let catalog = UnitCatalog::builtin();
        assert_eq!(
            catalog.lookup("dragon"),
            Err(SimError::UnknownUnitType("dragon".into()))
        );
    }

    #[test]
    fn kinds_are_sorted() {
        let catalog = UnitCatalog::builtin();
        let kinds: Vec<&str> = catalog.kinds().collect();
        assert_eq!(kinds, vec!["basic", "heavy", "ranged"]);
    }

    #[test]
    fn json_catalog_defaults_missing_range() {
        let json = r#"{
            "scout": { "color": 1, "hp": 5, "damage": 1, "speed": 0.5,
                       "attack_cooldown": 0.5, "cost": 10, "reward": 12 }
        }"#;
        let catalog = UnitCatalog::from_json_str(json).unwrap();
        let scout = catalog.lookup("scout").unwrap();
        assert_eq!(scout.range, None);
        assert_eq!(scout.reward, 12);
        assert!(catalog.lookup("basic").is_err());
    }

    #[test]
    fn json_catalog_rejects_garbage_and_empty() {
        assert!(matches!(
            UnitCatalog::from_json_str("not json"),
            Err(SimError::Catalog(_))
        ));
        assert!(matches!(
            UnitCatalog::from_json_str("{}"),
            Err(SimError::Catalog(_))
        ));
    }

    fn scout_with(field: &str, value: &str) -> String {
        let mut stats = vec![
            ("color", "1"),
            ("hp", "5"),
            ("damage", "1"),
            ("speed", "0.5"),
            ("attack_cooldown", "0.5"),
            ("cost", "10"),
            ("reward", "12"),
        ];
        match stats.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = value,
            None => stats.push((field, value)),
        }
        let body: Vec<String> = stats
            .iter()
            .map(|(k, v)| format!("\"{}\": {}", k, v))
            .collect();
        format!("{{ \"scout\": {{ {} }} }}", body.join(", "))
    }

    #[test]
    fn json_catalog_accepts_valid_scout() {
        assert!(UnitCatalog::from_json_str(&scout_with("range", "3.0")).is_ok());
        assert!(UnitCatalog::from_json_str(&scout_with("damage", "0")).is_ok());
    }

    #[test]
    fn json_catalog_rejects_negative_hp() {
        assert!(matches!(
            UnitCatalog::from_json_str(&scout_with("hp", "-5")),
            Err(SimError::Catalog(_))
        ));
    }

    #[test]
    fn json_catalog_rejects_zero_hp() {
        assert!(matches!(
            UnitCatalog::from_json_str(&scout_with("hp", "0")),
            Err(SimError::Catalog(_))
        ));
    }

    #[test]
    fn json_catalog_rejects_negative_damage() {
        assert!(matches!(
            UnitCatalog::from_json_str(&scout_with("damage", "-1")),
            Err(SimError::Catalog(_))
        ));
    }

    #[test]
    fn json_catalog_rejects_negative_speed() {
        assert!(matches!(
            UnitCatalog::from_json_str(&scout_with("speed", "-0.1")),
            Err(SimError::Catalog(_))
        ));
    }

    #[test]
    fn json_catalog_rejects_negative_cooldown() {
        assert!(matches!(
            UnitCatalog::from_json_str(&scout_with("attack_cooldown", "-2")),
            Err(SimError::Catalog(_))
        ));
    }

    #[test]
    fn json_catalog_rejects_negative_range() {
        assert!(matches!(
            UnitCatalog::from_json_str(&scout_with("range", "-1")),
            Err(SimError::Catalog(_))
        ));
    }

    #[test]
    fn non_finite_stats_are_rejected() {
        let mut archetype = UnitCatalog::builtin().lookup("basic").unwrap().clone();
        archetype.speed = f32::NAN;
        assert!(matches!(archetype.validate("basic"), Err(SimError::Catalog(_))));

        archetype.speed = 0.3;
        archetype.attack_cooldown = f32::INFINITY;
        assert!(matches!(archetype.validate("basic"), Err(SimError::Catalog(_))));
    }

    #[test]
    fn builtin_archetypes_are_valid() {
        let catalog = UnitCatalog::builtin();
        for kind in catalog.kinds() {
            assert!(catalog.lookup(kind).unwrap().validate(kind).is_ok());
        }
    }
}
