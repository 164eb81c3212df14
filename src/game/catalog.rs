//! Attribute roll for the unified food path
//!
//! Decides whether a new food is plain or elemental and, for elemental food,
//! which element, rarity level and effect variant it carries.

use rand::Rng;
use rand::seq::SliceRandom;

use super::element::Element;
use super::food::FoodTag;

/// Cumulative probability ceilings for levels 1 through 4; the rest is level 5
const LEVEL_THRESHOLDS: [f64; 4] = [0.40, 0.70, 0.85, 0.95];

pub const MAX_LEVEL: u8 = 5;
pub const SUB_TYPES: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodCatalog {
    element_food_probability: f64,
}

impl Default for FoodCatalog {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl FoodCatalog {
    /// `element_food_probability` is clamped into [0, 1]
    pub fn new(element_food_probability: f64) -> Self {
        let p = if element_food_probability.is_finite() {
            element_food_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            element_food_probability: p,
        }
    }

    pub fn element_food_probability(&self) -> f64 {
        self.element_food_probability
    }

    /// Draw the attributes of a new food
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> FoodTag {
        if !rng.gen_bool(self.element_food_probability) {
            return FoodTag::PLAIN;
        }

        let element = Element::ACTIVE
            .choose(rng)
            .copied()
            .unwrap_or(Element::Fire);
        let level = level_for(rng.gen_range(0.0..1.0));
        let sub_type = rng.gen_range(1..=SUB_TYPES);

        FoodTag::new(element, level, sub_type)
    }
}

fn level_for(roll: f64) -> u8 {
    LEVEL_THRESHOLDS
        .iter()
        .position(|&ceiling| roll < ceiling)
        .map_or(MAX_LEVEL, |i| i as u8 + 1)
}

/// Short label such as `Fire Lv2-3`
pub fn label(tag: &FoodTag) -> String {
    if tag.is_special() {
        format!("{} Lv{}-{}", tag.element.name(), tag.level, tag.sub_type)
    } else {
        "Plain".to_string()
    }
}

/// Human readable description of what eating the food does
pub fn describe(tag: &FoodTag) -> &'static str {
    let variant = tag.sub_type % SUB_TYPES;
    match tag.element {
        Element::None => "Plain food: +1 point",
        Element::Water => match variant {
            0 => "Water: faster movement",
            1 => "Water: extra life",
            2 => "Water: slower movement",
            3 => "Water: score multiplier",
            _ => "Water: shorter body",
        },
        Element::Ice => match variant {
            0 => "Ice: freeze enemies",
            1 => "Ice: more defense",
            2 => "Ice: slowing aura",
            3 => "Ice: longer freeze",
            _ => "Ice: slower movement",
        },
        Element::Fire => match variant {
            0 => "Fire: more attack",
            1 => "Fire: burning",
            2 => "Fire: faster movement",
            3 => "Fire: lose health",
            _ => "Fire: bonus score",
        },
        Element::Electric => match variant {
            0 => "Electric: paralysis",
            1 => "Electric: attack speed",
            2 => "Electric: chain damage",
            3 => "Electric: less defense",
            _ => "Electric: more energy",
        },
        Element::Wind => match variant {
            0 => "Wind: faster movement",
            1 => "Wind: evasion",
            2 => "Wind: less attack",
            3 => "Wind: higher jumps",
            _ => "Wind: lighter body",
        },
    }
}

/// Strength of the food's effect: an element base plus level and variant
pub fn effect_value(tag: &FoodTag) -> u32 {
    let base = match tag.element {
        Element::None => return 1,
        Element::Water => 2,
        Element::Ice => 3,
        Element::Fire => 4,
        Element::Electric => 5,
        Element::Wind => 6,
    };
    base + u32::from(tag.level) + u32::from(tag.sub_type % 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for(0.0), 1);
        assert_eq!(level_for(0.39), 1);
        assert_eq!(level_for(0.40), 2);
        assert_eq!(level_for(0.69), 2);
        assert_eq!(level_for(0.70), 3);
        assert_eq!(level_for(0.90), 4);
        assert_eq!(level_for(0.95), 5);
        assert_eq!(level_for(0.999), 5);
    }

    #[test]
    fn test_probability_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let never = FoodCatalog::new(0.0);
        let always = FoodCatalog::new(1.0);
        for _ in 0..200 {
            assert_eq!(never.roll(&mut rng), FoodTag::PLAIN);
            assert!(always.roll(&mut rng).is_special());
        }
    }

    #[test]
    fn test_probability_is_clamped() {
        assert_eq!(FoodCatalog::new(3.0).element_food_probability(), 1.0);
        assert_eq!(FoodCatalog::new(-1.0).element_food_probability(), 0.0);
        assert_eq!(FoodCatalog::new(f64::NAN).element_food_probability(), 0.0);
    }

    #[test]
    fn test_special_rolls_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let catalog = FoodCatalog::new(1.0);
        let mut levels: HashMap<u8, usize> = HashMap::new();
        for _ in 0..5000 {
            let tag = catalog.roll(&mut rng);
            assert!(!tag.element.is_none());
            assert!((1..=MAX_LEVEL).contains(&tag.level));
            assert!((1..=SUB_TYPES).contains(&tag.sub_type));
            *levels.entry(tag.level).or_default() += 1;
        }
        // Level 1 is the most common tier, level 5 the rarest
        assert!(levels[&1] > levels[&2]);
        assert!(levels[&4] > levels[&5]);
    }

    #[test]
    fn test_descriptions_and_labels() {
        assert_eq!(describe(&FoodTag::PLAIN), "Plain food: +1 point");
        assert_eq!(describe(&FoodTag::new(Element::Fire, 1, 5)), "Fire: more attack");
        assert_eq!(label(&FoodTag::PLAIN), "Plain");
        assert_eq!(label(&FoodTag::new(Element::Ice, 2, 3)), "Ice Lv2-3");
    }

    #[test]
    fn test_effect_value() {
        assert_eq!(effect_value(&FoodTag::PLAIN), 1);
        // Wind base 6 + level 2 + (4 % 3)
        assert_eq!(effect_value(&FoodTag::new(Element::Wind, 2, 4)), 9);
        assert_eq!(effect_value(&FoodTag::new(Element::Water, 1, 3)), 3);
    }
}
