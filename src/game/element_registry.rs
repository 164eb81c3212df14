use std::sync::Arc;

use rand::SeedableRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand_chacha::ChaCha8Rng;

use super::element::{Element, ElementEffect, ElementReaction, ElementTable};
use super::list::{EntityList, NodeId};
use super::snake::Snake;
use super::spawn::{Occupancy, find_free_cell};
use super::state::Position;

/// Score for any element food
pub const ELEMENT_FOOD_VALUE: u32 = 2;

pub type ElementFoodId = NodeId;

/// Food carrying an element and the effect it grants when eaten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementFood {
    pub position: Position,
    pub element: Element,
    pub effect: ElementEffect,
    pub value: u32,
}

impl Occupancy for EntityList<ElementFood> {
    fn occupies(&self, pos: Position) -> bool {
        self.iter().any(|f| f.position == pos)
    }
}

/// Element food on the grid plus the shared effect/reaction table
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    foods: EntityList<ElementFood>,
    max_count: usize,
    table: Arc<ElementTable>,
    rng: ChaCha8Rng,
}

impl ElementRegistry {
    pub fn new(max_count: usize, table: Arc<ElementTable>, rng: ChaCha8Rng) -> Self {
        Self {
            foods: EntityList::with_capacity(max_count),
            max_count,
            table,
            rng,
        }
    }

    pub fn with_seed(max_count: usize, table: Arc<ElementTable>, seed: u64) -> Self {
        Self::new(max_count, table, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(max_count: usize, table: Arc<ElementTable>) -> Self {
        Self::new(max_count, table, ChaCha8Rng::from_entropy())
    }

    pub fn generate(&mut self, grid_width: usize, grid_height: usize, snake: &Snake) -> bool {
        self.generate_among(grid_width, grid_height, &[snake])
    }

    /// Place one element food on a cell free of element food and `obstacles`.
    ///
    /// The element is drawn uniformly from the active elements, then one of
    /// its effects. An element without configured effects fails the attempt.
    pub fn generate_among(
        &mut self,
        grid_width: usize,
        grid_height: usize,
        obstacles: &[&dyn Occupancy],
    ) -> bool {
        if self.is_max_reached() {
            return false;
        }

        let mut blocked: Vec<&dyn Occupancy> = obstacles.to_vec();
        blocked.push(&self.foods);
        let Some(position) = find_free_cell(&mut self.rng, grid_width, grid_height, &blocked)
        else {
            return false;
        };

        let Some(element) = Element::ACTIVE.choose(&mut self.rng).copied() else {
            return false;
        };
        let Some(effect) = pick_effect(&self.table, element, &mut self.rng).cloned() else {
            tracing::debug!(?element, "no effects configured, skipping spawn");
            return false;
        };

        tracing::debug!(
            x = position.x,
            y = position.y,
            ?element,
            effect = %effect.name,
            "element food spawned"
        );
        self.foods.push_front(ElementFood {
            position,
            element,
            effect,
            value: ELEMENT_FOOD_VALUE,
        });
        true
    }

    pub fn reaction(&self, a: Element, b: Element) -> Option<&ElementReaction> {
        self.table.reaction(a, b)
    }

    /// A uniformly chosen effect for `element`, `None` if it has none
    pub fn random_effect(&mut self, element: Element) -> Option<&ElementEffect> {
        pick_effect(&self.table, element, &mut self.rng)
    }

    pub fn check_at(&self, pos: Position) -> Option<ElementFoodId> {
        self.foods.find(|f| f.position == pos)
    }

    pub fn get(&self, id: ElementFoodId) -> Option<&ElementFood> {
        self.foods.get(id)
    }

    pub fn take(&mut self, id: ElementFoodId) -> Option<ElementFood> {
        self.foods.remove(id)
    }

    /// Remove an element food and return its value, 0 for a stale handle
    pub fn remove(&mut self, id: ElementFoodId) -> u32 {
        self.take(id).map_or(0, |f| f.value)
    }

    pub fn count(&self) -> usize {
        self.foods.len()
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn is_max_reached(&self) -> bool {
        self.foods.len() >= self.max_count
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ElementFood> + '_ {
        self.foods.iter()
    }

    pub fn clear(&mut self) {
        self.foods.clear();
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, food: ElementFood) -> ElementFoodId {
        self.foods.push_front(food)
    }

    pub fn table(&self) -> &Arc<ElementTable> {
        &self.table
    }

    /// Swap in a new table. Food already on the grid keeps its effect.
    pub fn reload(&mut self, table: Arc<ElementTable>) {
        self.table = table;
        tracing::info!(
            effects = self.table.effects.len(),
            reactions = self.table.reactions.len(),
            "element table reloaded"
        );
    }
}

impl Occupancy for ElementRegistry {
    fn occupies(&self, pos: Position) -> bool {
        self.foods.occupies(pos)
    }
}

fn pick_effect<'t>(
    table: &'t ElementTable,
    element: Element,
    rng: &mut ChaCha8Rng,
) -> Option<&'t ElementEffect> {
    table.effects_for(element).choose(rng)
}
