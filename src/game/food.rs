use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::catalog::FoodCatalog;
use super::element::Element;
use super::list::{EntityList, NodeId};
use super::snake::Snake;
use super::spawn::{Occupancy, find_free_cell};
use super::state::Position;

/// Score for a plain piece of food
pub const PLAIN_FOOD_VALUE: u32 = 1;

/// Handle to a food in a [`FoodRegistry`]
pub type FoodId = NodeId;

/// Elemental metadata carried by food and snake segments.
///
/// Doubles as the color selector for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FoodTag {
    pub element: Element,
    /// Rarity tier, 1..=5 for special food
    pub level: u8,
    /// Effect variant inside an element/level, 1..=5 for special food
    pub sub_type: u8,
}

impl FoodTag {
    pub const PLAIN: FoodTag = FoodTag {
        element: Element::None,
        level: 0,
        sub_type: 0,
    };

    pub fn new(element: Element, level: u8, sub_type: u8) -> Self {
        Self {
            element,
            level,
            sub_type,
        }
    }

    pub fn is_special(&self) -> bool {
        !self.element.is_none()
    }

    /// Score granted for food carrying this tag
    pub fn value(&self) -> u32 {
        if self.is_special() {
            PLAIN_FOOD_VALUE + u32::from(self.level) * 2
        } else {
            PLAIN_FOOD_VALUE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    pub value: u32,
    pub tag: FoodTag,
}

impl Occupancy for EntityList<Food> {
    fn occupies(&self, pos: Position) -> bool {
        self.iter().any(|f| f.position == pos)
    }
}

/// The set of food currently on the grid, capped at `max_count`
#[derive(Debug, Clone)]
pub struct FoodRegistry {
    foods: EntityList<Food>,
    max_count: usize,
    rng: ChaCha8Rng,
}

impl FoodRegistry {
    pub fn new(max_count: usize, rng: ChaCha8Rng) -> Self {
        Self {
            foods: EntityList::with_capacity(max_count),
            max_count,
            rng,
        }
    }

    pub fn with_seed(max_count: usize, seed: u64) -> Self {
        Self::new(max_count, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(max_count: usize) -> Self {
        Self::new(max_count, ChaCha8Rng::from_entropy())
    }

    /// Place one plain food on a free cell not covered by `snake`
    pub fn generate(&mut self, grid_width: usize, grid_height: usize, snake: &Snake) -> bool {
        self.generate_among(grid_width, grid_height, &[snake])
    }

    /// Place one plain food on a cell that no food and no obstacle occupies
    pub fn generate_among(
        &mut self,
        grid_width: usize,
        grid_height: usize,
        obstacles: &[&dyn Occupancy],
    ) -> bool {
        self.generate_special(grid_width, grid_height, obstacles, FoodTag::PLAIN)
    }

    /// Place one food carrying `tag`; its value follows from the tag
    pub fn generate_special(
        &mut self,
        grid_width: usize,
        grid_height: usize,
        obstacles: &[&dyn Occupancy],
        tag: FoodTag,
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

        let food = Food {
            position,
            value: tag.value(),
            tag,
        };
        self.foods.push_front(food);
        tracing::debug!(
            x = position.x,
            y = position.y,
            value = food.value,
            element = ?tag.element,
            "food spawned"
        );
        true
    }

    /// Place one food whose attributes are rolled from `catalog`: plain or
    /// elemental, with level and sub type
    pub fn generate_mixed(
        &mut self,
        grid_width: usize,
        grid_height: usize,
        obstacles: &[&dyn Occupancy],
        catalog: &FoodCatalog,
    ) -> bool {
        if self.is_max_reached() {
            return false;
        }
        let tag = catalog.roll(&mut self.rng);
        self.generate_special(grid_width, grid_height, obstacles, tag)
    }

    /// Food lying on `pos`, if any
    pub fn check_at(&self, pos: Position) -> Option<FoodId> {
        self.foods.find(|f| f.position == pos)
    }

    pub fn get(&self, id: FoodId) -> Option<&Food> {
        self.foods.get(id)
    }

    /// Remove a food and hand it back; stale handles yield `None`
    pub fn take(&mut self, id: FoodId) -> Option<Food> {
        self.foods.remove(id)
    }

    /// Remove a food and return its score value, 0 for a stale handle
    pub fn remove(&mut self, id: FoodId) -> u32 {
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

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Food> + '_ {
        self.foods.iter()
    }

    pub fn clear(&mut self) {
        self.foods.clear();
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, food: Food) -> FoodId {
        self.foods.push_front(food)
    }
}

impl Occupancy for FoodRegistry {
    fn occupies(&self, pos: Position) -> bool {
        self.foods.occupies(pos)
    }
}
