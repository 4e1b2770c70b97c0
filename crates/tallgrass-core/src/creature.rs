//! Creatures and experience-based leveling

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Experience needed per level to advance
pub const EXP_PER_LEVEL: u32 = 10;
/// Max hit points gained on each level-up
pub const HP_PER_LEVEL: u32 = 5;
/// Attack gained on each level-up
pub const ATTACK_PER_LEVEL: u32 = 1;

/// A party member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub id: String,
    pub name: String,
    pub level: u32,
    /// Experience accumulated towards the next level
    pub exp: u32,
    pub max_hp: u32,
    pub hp: u32,
    pub attack: u32,
}

impl Creature {
    /// Create a level 1 creature at full health
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_hp: u32, attack: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 1,
            exp: 0,
            max_hp,
            hp: max_hp,
            attack,
        }
    }

    /// Set the starting level
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Experience required to leave the current level
    pub fn exp_to_next_level(&self) -> u32 {
        self.level.saturating_mul(EXP_PER_LEVEL)
    }

    /// Check the at-rest invariants
    pub fn validate(&self) -> Result<()> {
        if self.hp > self.max_hp {
            return Err(Error::InvalidCreature {
                id: self.id.clone(),
                reason: format!("hp {} exceeds max_hp {}", self.hp, self.max_hp),
            });
        }
        Ok(())
    }

    /// This creature after gaining `amount` experience
    ///
    /// Every threshold crossed levels up once: the threshold is spent,
    /// `max_hp` and `attack` grow and hit points are fully restored. Returns
    /// the updated creature and the number of levels gained.
    pub fn gain_exp(&self, amount: u32) -> (Self, u32) {
        let mut next = self.clone();
        let mut levels = 0;
        next.exp = next.exp.saturating_add(amount);

        while next.exp >= next.exp_to_next_level() {
            next.exp -= next.exp_to_next_level();
            next.level = next.level.saturating_add(1);
            next.max_hp = next.max_hp.saturating_add(HP_PER_LEVEL);
            next.hp = next.max_hp;
            next.attack = next.attack.saturating_add(ATTACK_PER_LEVEL);
            levels += 1;
        }

        (next, levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprout() -> Creature {
        Creature::new("c1", "Sprout", 20, 5)
    }

    #[test]
    fn test_small_gain_no_level() {
        let (next, levels) = sprout().gain_exp(9);
        assert_eq!(levels, 0);
        assert_eq!(next.level, 1);
        assert_eq!(next.exp, 9);
    }

    #[test]
    fn test_multi_level_gain() {
        let mut hurt = sprout();
        hurt.hp = 3;

        let (next, levels) = hurt.gain_exp(25);
        assert_eq!(levels, 2);
        assert_eq!(next.level, 3);
        assert_eq!(next.exp, 5);
        assert_eq!(next.max_hp, 30);
        assert_eq!(next.hp, next.max_hp);
        assert_eq!(next.attack, 7);
    }

    #[test]
    fn test_threshold_grows_with_level() {
        let creature = sprout().with_level(4);
        assert_eq!(creature.exp_to_next_level(), 40);

        let (next, levels) = creature.gain_exp(39);
        assert_eq!(levels, 0);
        assert_eq!(next.exp, 39);
    }

    #[test]
    fn test_huge_gain_terminates() {
        let (next, levels) = sprout().gain_exp(u32::MAX);
        assert!(levels > 0);
        assert!(next.exp < next.exp_to_next_level());
    }

    #[test]
    fn test_validate_hp() {
        let mut creature = sprout();
        assert!(creature.validate().is_ok());
        creature.hp = 21;
        assert!(creature.validate().is_err());
    }
}
