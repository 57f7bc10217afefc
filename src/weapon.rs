//! Weapon definitions and the weapon table.

use crate::aim::AimAnchor;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponId {
    Bow,
    Spear,
}

/// Which spawn routine a weapon uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Instant ranged shot; the arrow's rear edge sits on the bow.
    Arrow,
    /// Thrown melee weapon, released from the shoulder.
    Spear,
}

/// Geometry and stats of the projectile a weapon fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub kind: ProjectileKind,
    pub damage: f32,
    pub speed: f32,
    /// Length along the flight direction.
    pub length: f32,
    pub gravity: f32,
    /// Add the shooter's velocity on axes where it points the same way.
    pub compensate_shooter: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub id: WeaponId,
    pub attack_interval_ms: f32,
    pub anchor: AimAnchor,
    pub projectile: ProjectileSpec,
}

/// Immutable table of weapons, looked up by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arsenal {
    weapons: Vec<Weapon>,
}

impl Arsenal {
    pub fn new(weapons: Vec<Weapon>) -> Self {
        Self { weapons }
    }

    pub fn get(&self, id: WeaponId) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.iter()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bow() -> Weapon {
        Weapon {
            id: WeaponId::Bow,
            attack_interval_ms: 400.0,
            anchor: AimAnchor::Center,
            projectile: ProjectileSpec {
                kind: ProjectileKind::Arrow,
                damage: 10.0,
                speed: 1000.0,
                length: 37.0,
                gravity: 700.0,
                compensate_shooter: true,
            },
        }
    }

    #[test]
    fn lookup_by_id() {
        let arsenal = Arsenal::new(vec![bow()]);
        assert_eq!(arsenal.get(WeaponId::Bow).map(|w| w.id), Some(WeaponId::Bow));
        assert!(arsenal.get(WeaponId::Spear).is_none());
        assert_eq!(arsenal.len(), 1);
    }

    #[test]
    fn weapon_ids_parse_from_snake_case() {
        #[derive(Deserialize)]
        struct Slots {
            slots: Vec<WeaponId>,
        }
        let parsed: Slots = toml::from_str(r#"slots = ["bow", "spear"]"#).unwrap();
        assert_eq!(parsed.slots, vec![WeaponId::Bow, WeaponId::Spear]);
    }
}
