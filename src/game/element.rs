//! Elements, their effects and pairwise reactions
//!
//! The [`ElementTable`] holds the effect and reaction configuration. It is
//! built once (built-in defaults, optionally replaced from a TOML file) and
//! shared read-only through an `Arc` by everything that needs it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Elemental affinity of a food or effect. `None` marks plain food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Element {
    #[default]
    None,
    Wind,
    Fire,
    Electric,
    Ice,
    Water,
}

impl Element {
    /// Every element except `None`
    pub const ACTIVE: [Element; 5] = [
        Element::Wind,
        Element::Fire,
        Element::Electric,
        Element::Ice,
        Element::Water,
    ];

    pub fn is_none(self) -> bool {
        self == Element::None
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::None => "None",
            Element::Wind => "Wind",
            Element::Fire => "Fire",
            Element::Electric => "Electric",
            Element::Ice => "Ice",
            Element::Water => "Water",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionKind {
    Evaporate,
    Melt,
    Freeze,
    Overload,
    Superconduct,
    ElectroCharged,
    Swirl,
}

impl ReactionKind {
    pub fn name(self) -> &'static str {
        match self {
            ReactionKind::Evaporate => "Evaporate",
            ReactionKind::Melt => "Melt",
            ReactionKind::Freeze => "Freeze",
            ReactionKind::Overload => "Overload",
            ReactionKind::Superconduct => "Superconduct",
            ReactionKind::ElectroCharged => "Electro-Charged",
            ReactionKind::Swirl => "Swirl",
        }
    }
}

/// A timed bonus granted by eating element food
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementEffect {
    pub name: String,
    /// Lifetime in ticks
    pub duration: u32,
    pub power: i32,
    pub element: Element,
}

impl ElementEffect {
    pub fn new(name: impl Into<String>, duration: u32, power: i32, element: Element) -> Self {
        Self {
            name: name.into(),
            duration,
            power,
            element,
        }
    }
}

/// What happens when two elements meet. The pair is unordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementReaction {
    pub first: Element,
    pub second: Element,
    pub kind: ReactionKind,
    pub damage: i32,
    pub duration: u32,
}

impl ElementReaction {
    pub fn new(
        first: Element,
        second: Element,
        kind: ReactionKind,
        damage: i32,
        duration: u32,
    ) -> Self {
        Self {
            first,
            second,
            kind,
            damage,
            duration,
        }
    }

    /// True if this reaction covers `a` and `b` in either order
    pub fn matches(&self, a: Element, b: Element) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Effect and reaction configuration.
///
/// A TOML override may carry `[[effects]]`, `[[reactions]]` or both; a list
/// that is absent from the file keeps its built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementTable {
    #[serde(default = "default_effects")]
    pub effects: Vec<ElementEffect>,
    #[serde(default = "default_reactions")]
    pub reactions: Vec<ElementReaction>,
}

impl Default for ElementTable {
    fn default() -> Self {
        Self {
            effects: default_effects(),
            reactions: default_reactions(),
        }
    }
}

impl ElementTable {
    /// Effects configured for `element`, in table order
    pub fn effects_for(&self, element: Element) -> impl Iterator<Item = &ElementEffect> + '_ {
        self.effects.iter().filter(move |e| e.element == element)
    }

    /// Symmetric reaction lookup. `None` if either side is `Element::None` or no
    /// pair matches.
    pub fn reaction(&self, a: Element, b: Element) -> Option<&ElementReaction> {
        if a.is_none() || b.is_none() {
            return None;
        }
        self.reactions.iter().find(|r| r.matches(a, b))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: ElementTable = toml::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load an override file, falling back to the built-in table on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => {
                tracing::info!(
                    ?path,
                    effects = table.effects.len(),
                    reactions = table.reactions.len(),
                    "loaded element table"
                );
                table
            }
            Err(err) => {
                tracing::warn!(?path, %err, "using built-in element table");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(effect) = self.effects.iter().find(|e| e.element.is_none()) {
            return Err(ConfigError::invalid(format!(
                "effect {:?} has no element",
                effect.name
            )));
        }
        if let Some(reaction) = self
            .reactions
            .iter()
            .find(|r| r.first.is_none() || r.second.is_none())
        {
            return Err(ConfigError::invalid(format!(
                "{} reaction needs two elements",
                reaction.kind.name()
            )));
        }
        Ok(())
    }
}

fn default_effects() -> Vec<ElementEffect> {
    use Element::{Electric, Fire, Ice, Water, Wind};

    vec![
        ElementEffect::new("Gale Sprint", 300, 5, Wind),
        ElementEffect::new("Wind Shield", 200, 3, Wind),
        ElementEffect::new("Cyclone Strike", 150, 8, Wind),
        ElementEffect::new("Blaze Boost", 250, 7, Fire),
        ElementEffect::new("Scorch", 180, 6, Fire),
        ElementEffect::new("Burst Impact", 120, 10, Fire),
        ElementEffect::new("Lightning Speed", 280, 6, Electric),
        ElementEffect::new("Magnetic Shield", 220, 4, Electric),
        ElementEffect::new("Thunder Stun", 160, 9, Electric),
        ElementEffect::new("Frost Slow", 320, 4, Ice),
        ElementEffect::new("Frost Armor", 240, 5, Ice),
        ElementEffect::new("Glacial Burst", 140, 7, Ice),
        ElementEffect::new("Healing Stream", 350, 3, Water),
        ElementEffect::new("Water Barrier", 260, 4, Water),
        ElementEffect::new("Tidal Strike", 130, 6, Water),
    ]
}

fn default_reactions() -> Vec<ElementReaction> {
    use Element::{Electric, Fire, Ice, Water, Wind};
    use ReactionKind::{ElectroCharged, Evaporate, Freeze, Melt, Overload, Superconduct, Swirl};

    vec![
        ElementReaction::new(Fire, Water, Evaporate, 20, 60),
        ElementReaction::new(Fire, Ice, Melt, 15, 50),
        ElementReaction::new(Ice, Water, Freeze, 10, 80),
        ElementReaction::new(Fire, Electric, Overload, 25, 40),
        ElementReaction::new(Ice, Electric, Superconduct, 18, 55),
        ElementReaction::new(Water, Electric, ElectroCharged, 12, 70),
        ElementReaction::new(Wind, Fire, Swirl, 8, 45),
        ElementReaction::new(Wind, Water, Swirl, 8, 45),
        ElementReaction::new(Wind, Ice, Swirl, 8, 45),
        ElementReaction::new(Wind, Electric, Swirl, 8, 45),
    ]
}
