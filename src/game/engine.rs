use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use super::{
    catalog::FoodCatalog,
    config::GameConfig,
    direction::Direction,
    element::{Element, ElementEffect, ElementTable, ReactionKind},
    element_registry::{ElementFood, ElementRegistry},
    food::{Food, FoodRegistry},
    snake::Snake,
    spawn::Occupancy,
    state::{GameState, Phase, Position},
};
use crate::error::MoveError;

/// Number of collected elements remembered for reactions
pub const ELEMENT_HISTORY_LEN: usize = 10;

/// An element effect currently running on the snake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEffect {
    pub effect: ElementEffect,
    /// Ticks left before the effect wears off
    pub remaining: u32,
}

/// A reaction between the two most recently collected elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionEvent {
    pub first: Element,
    pub second: Element,
    pub kind: ReactionKind,
    /// Score added by the reaction
    pub bonus: u32,
    pub duration: u32,
}

/// What the snake ate this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumed {
    Food(Food),
    Element(ElementFood),
}

impl Consumed {
    pub fn value(&self) -> u32 {
        match self {
            Consumed::Food(food) => food.value,
            Consumed::Element(food) => food.value,
        }
    }

    pub fn element(&self) -> Element {
        match self {
            Consumed::Food(food) => food.tag.element,
            Consumed::Element(food) => food.element,
        }
    }
}

/// Information about a tick
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Head position after the move, `None` if the snake did not move
    pub head: Option<Position>,
    pub consumed: Option<Consumed>,
    pub reaction: Option<ReactionEvent>,
    /// Set when the move failed; a fatal error ends the game
    pub collision: Option<MoveError>,
    /// Food and element food placed during replenishment
    pub spawned: usize,
}

impl TickOutcome {
    pub fn terminated(&self) -> bool {
        self.collision.is_some()
    }
}

/// The game engine that owns every entity and applies the rules
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    catalog: FoodCatalog,
    state: GameState,
    snake: Snake,
    foods: FoodRegistry,
    elements: ElementRegistry,
    effects: Vec<ActiveEffect>,
    history: VecDeque<Element>,
    last_reaction: Option<ReactionEvent>,
}

impl GameEngine {
    /// Build an engine sitting in the menu with a fresh board.
    ///
    /// A configured seed drives both registries, so a seeded engine replays
    /// the same spawns for the same inputs.
    pub fn new(config: GameConfig, table: Arc<ElementTable>) -> Self {
        let (foods, elements) = match config.seed {
            Some(seed) => (
                FoodRegistry::with_seed(config.max_food_count, seed),
                ElementRegistry::with_seed(
                    config.max_element_food_count,
                    table,
                    seed.wrapping_add(1),
                ),
            ),
            None => (
                FoodRegistry::from_entropy(config.max_food_count),
                ElementRegistry::from_entropy(config.max_element_food_count, table),
            ),
        };

        let mut engine = Self {
            catalog: config.catalog(),
            state: GameState::new(config.move_interval()),
            snake: Self::initial_snake(&config),
            foods,
            elements,
            effects: Vec::new(),
            history: VecDeque::with_capacity(ELEMENT_HISTORY_LEN),
            last_reaction: None,
            config,
        };
        engine.replenish();
        engine
    }

    fn initial_snake(config: &GameConfig) -> Snake {
        let center_x = (config.grid_width / 2) as i32;
        let center_y = (config.grid_height / 2) as i32;
        Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            config.initial_snake_length,
        )
    }

    /// Leave the menu and start moving
    pub fn start(&mut self) {
        if self.state.phase == Phase::Menu {
            self.state.start();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
    }

    /// Buffer a heading for the next tick; see [`GameState::change_direction`]
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        self.state.change_direction(direction)
    }

    /// Feed elapsed wall time; runs a tick whenever the move interval elapsed
    pub fn update(&mut self, dt: Duration) -> Option<TickOutcome> {
        if self.state.update(dt) {
            self.tick()
        } else {
            None
        }
    }

    /// Move the snake one cell and apply the consequences.
    ///
    /// Does nothing outside `Playing`. A buffered heading is committed first.
    /// Order within a tick: running effects
    /// count down, the snake advances (growing onto food), the eaten food is
    /// scored, elements react, then the board is refilled.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.state.is_playing() {
            return None;
        }

        self.decay_effects();

        let mut outcome = TickOutcome::default();
        let direction = self.state.apply_turn();
        let Some(head) = self.snake.head() else {
            outcome.collision = Some(MoveError::Empty);
            self.state.game_over();
            return Some(outcome);
        };

        let candidate = head.moved_in_direction(direction);
        let food_id = self.foods.check_at(candidate);
        let element_id = self.elements.check_at(candidate);
        let grow = food_id.is_some() || element_id.is_some();

        match self.snake.advance(
            direction,
            self.config.grid_width,
            self.config.grid_height,
            grow,
        ) {
            Ok(new_head) => outcome.head = Some(new_head),
            Err(err) => {
                tracing::debug!(%err, "move failed");
                outcome.collision = Some(err);
                self.state.game_over();
                return Some(outcome);
            }
        }

        if let Some(food) = food_id.and_then(|id| self.foods.take(id)) {
            self.state.score += food.value;
            if food.tag.is_special() {
                outcome.reaction = self.collect_element(food.tag.element);
            }
            tracing::debug!(value = food.value, element = ?food.tag.element, "food eaten");
            outcome.consumed = Some(Consumed::Food(food));
        } else if let Some(food) = element_id.and_then(|id| self.elements.take(id)) {
            self.state.score += food.value;
            self.effects.push(ActiveEffect {
                effect: food.effect.clone(),
                remaining: food.effect.duration,
            });
            outcome.reaction = self.collect_element(food.element);
            tracing::debug!(
                element = ?food.element,
                effect = %food.effect.name,
                "element food eaten"
            );
            outcome.consumed = Some(Consumed::Element(food));
        }

        outcome.spawned = self.replenish();
        Some(outcome)
    }

    fn decay_effects(&mut self) {
        self.effects.retain_mut(|active| {
            active.remaining = active.remaining.saturating_sub(1);
            active.remaining > 0
        });
    }

    /// Remember a collected element and check it against the previous one.
    ///
    /// A reaction scores its damage as a bonus and consumes both elements.
    fn collect_element(&mut self, element: Element) -> Option<ReactionEvent> {
        if element.is_none() {
            return None;
        }
        if self.history.len() == ELEMENT_HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(element);

        let len = self.history.len();
        if len < 2 {
            return None;
        }
        let (first, second) = (self.history[len - 2], self.history[len - 1]);
        let reaction = self.elements.reaction(first, second)?;
        let event = ReactionEvent {
            first,
            second,
            kind: reaction.kind,
            bonus: u32::try_from(reaction.damage).unwrap_or(0),
            duration: reaction.duration,
        };

        self.history.truncate(len - 2);
        self.state.score += event.bonus;
        self.last_reaction = Some(event);
        tracing::debug!(kind = event.kind.name(), bonus = event.bonus, "elements reacted");
        Some(event)
    }

    /// Top both registries up to their caps. Each placement avoids the snake
    /// and the other registry. Returns how many items were placed.
    fn replenish(&mut self) -> usize {
        let Self {
            config,
            catalog,
            snake,
            foods,
            elements,
            ..
        } = self;
        let (width, height) = (config.grid_width, config.grid_height);
        let mut spawned = 0;

        while !foods.is_max_reached() {
            let obstacles: [&dyn Occupancy; 2] = [&*snake, &*elements];
            if !foods.generate_mixed(width, height, &obstacles, catalog) {
                break;
            }
            spawned += 1;
        }
        while !elements.is_max_reached() {
            let obstacles: [&dyn Occupancy; 2] = [&*snake, &*foods];
            if !elements.generate_among(width, height, &obstacles) {
                break;
            }
            spawned += 1;
        }
        spawned
    }

    /// Clear the board and return to the menu with a new snake and food
    pub fn reset(&mut self) {
        self.snake.clear();
        self.foods.clear();
        self.elements.clear();
        self.effects.clear();
        self.history.clear();
        self.last_reaction = None;

        self.state.reset();
        self.snake = Self::initial_snake(&self.config);
        self.replenish();
    }

    /// Reset and immediately start playing
    pub fn restart(&mut self) {
        self.reset();
        self.state.start();
    }

    /// Replace the effect and reaction table for future spawns
    pub fn reload_elements(&mut self, table: Arc<ElementTable>) {
        self.elements.reload(table);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn foods(&self) -> &FoodRegistry {
        &self.foods
    }

    pub fn elements(&self) -> &ElementRegistry {
        &self.elements
    }

    pub fn active_effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    /// Collected elements not yet consumed by a reaction, oldest first
    pub fn element_history(&self) -> impl ExactSizeIterator<Item = Element> + '_ {
        self.history.iter().copied()
    }

    pub fn last_reaction(&self) -> Option<&ReactionEvent> {
        self.last_reaction.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::element_registry::ELEMENT_FOOD_VALUE;
    use crate::game::food::FoodTag;
    use std::collections::HashSet;

    fn engine_with(config: GameConfig) -> GameEngine {
        GameEngine::new(config, Arc::new(ElementTable::default()))
    }

    /// Seeded 10x10 engine with an empty board, already playing
    fn bare_engine() -> GameEngine {
        let config = GameConfig {
            max_food_count: 0,
            max_element_food_count: 0,
            ..GameConfig::small()
        };
        let mut engine = engine_with(config);
        engine.start();
        engine
    }

    fn ahead(engine: &GameEngine) -> Position {
        engine
            .snake()
            .head()
            .unwrap()
            .moved_in_direction(engine.state().direction())
    }

    fn place_element(engine: &mut GameEngine, position: Position, element: Element) {
        let effect = engine
            .elements
            .table()
            .effects_for(element)
            .next()
            .unwrap()
            .clone();
        engine.elements.insert(ElementFood {
            position,
            element,
            effect,
            value: ELEMENT_FOOD_VALUE,
        });
    }

    fn occupied_cells(engine: &GameEngine) -> Vec<Position> {
        engine
            .snake()
            .positions()
            .chain(engine.foods().iter().map(|f| f.position))
            .chain(engine.elements().iter().map(|f| f.position))
            .collect()
    }

    #[test]
    fn test_new_engine_waits_in_menu() {
        let engine = engine_with(GameConfig::small());
        assert_eq!(engine.phase(), Phase::Menu);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.snake().head(), Some(Position::new(5, 5)));
        assert_eq!(engine.foods().count(), 5);
        assert_eq!(engine.elements().count(), 2);
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        let mut engine = engine_with(GameConfig::small());
        assert!(engine.tick().is_none());
        assert!(engine.update(Duration::from_secs(5)).is_none());
        assert_eq!(engine.snake().head(), Some(Position::new(5, 5)));
    }

    #[test]
    fn test_update_waits_for_interval() {
        let mut engine = bare_engine();
        assert!(engine.update(Duration::from_millis(100)).is_none());
        let outcome = engine.update(Duration::from_millis(250)).unwrap();
        assert_eq!(outcome.head, Some(Position::new(6, 5)));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = bare_engine();
        let outcome = engine.tick().unwrap();

        assert!(!outcome.terminated());
        assert!(outcome.consumed.is_none());
        assert_eq!(engine.snake().head(), Some(Position::new(6, 5)));
        assert_eq!(engine.snake().len(), 3);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = bare_engine();
        let target = ahead(&engine);
        engine.foods.insert(Food {
            position: target,
            value: 1,
            tag: FoodTag::PLAIN,
        });

        let outcome = engine.tick().unwrap();

        assert!(matches!(outcome.consumed, Some(Consumed::Food(_))));
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.foods().count(), 0);
    }

    #[test]
    fn test_element_food_starts_effect() {
        let mut engine = bare_engine();
        let target = ahead(&engine);
        place_element(&mut engine, target, Element::Ice);

        let outcome = engine.tick().unwrap();

        assert_eq!(outcome.consumed.as_ref().map(Consumed::element), Some(Element::Ice));
        assert_eq!(engine.score(), ELEMENT_FOOD_VALUE);
        assert_eq!(engine.active_effects().len(), 1);
        let duration = engine.active_effects()[0].effect.duration;
        assert_eq!(engine.active_effects()[0].remaining, duration);
        assert_eq!(engine.element_history().collect::<Vec<_>>(), vec![Element::Ice]);

        engine.tick().unwrap();
        assert_eq!(engine.active_effects()[0].remaining, duration - 1);
    }

    #[test]
    fn test_effects_expire() {
        let mut engine = bare_engine();
        engine.effects.push(ActiveEffect {
            effect: ElementEffect::new("Blink", 2, 1, Element::Wind),
            remaining: 2,
        });
        engine.tick().unwrap();
        assert_eq!(engine.active_effects().len(), 1);
        engine.tick().unwrap();
        assert!(engine.active_effects().is_empty());
    }

    #[test]
    fn test_reaction_adds_bonus_and_consumes_elements() {
        let mut engine = bare_engine();
        let first = ahead(&engine);
        place_element(&mut engine, first, Element::Fire);
        place_element(&mut engine, first.moved_in_direction(Direction::Right), Element::Water);

        assert!(engine.tick().unwrap().reaction.is_none());
        let outcome = engine.tick().unwrap();

        let reaction = outcome.reaction.unwrap();
        assert_eq!(reaction.kind, ReactionKind::Evaporate);
        assert_eq!(reaction.bonus, 20);
        assert_eq!(engine.score(), 2 * ELEMENT_FOOD_VALUE + 20);
        assert_eq!(engine.element_history().len(), 0);
        assert_eq!(engine.last_reaction(), Some(&reaction));
        assert_eq!(engine.snake().len(), 5);
    }

    #[test]
    fn test_same_elements_do_not_react() {
        let mut engine = bare_engine();
        let first = ahead(&engine);
        place_element(&mut engine, first, Element::Fire);
        place_element(&mut engine, first.moved_in_direction(Direction::Right), Element::Fire);

        engine.tick().unwrap();
        assert!(engine.tick().unwrap().reaction.is_none());
        assert_eq!(engine.element_history().len(), 2);
    }

    #[test]
    fn test_tagged_food_feeds_reactions() {
        let mut engine = bare_engine();
        let first = ahead(&engine);
        place_element(&mut engine, first, Element::Ice);
        let tag = FoodTag::new(Element::Electric, 2, 1);
        engine.foods.insert(Food {
            position: first.moved_in_direction(Direction::Right),
            value: tag.value(),
            tag,
        });

        engine.tick().unwrap();
        let outcome = engine.tick().unwrap();

        assert_eq!(outcome.reaction.map(|r| r.kind), Some(ReactionKind::Superconduct));
        assert_eq!(engine.score(), ELEMENT_FOOD_VALUE + tag.value() + 18);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut engine = bare_engine();
        for _ in 0..ELEMENT_HISTORY_LEN + 3 {
            engine.collect_element(Element::Fire);
        }
        assert_eq!(engine.element_history().len(), ELEMENT_HISTORY_LEN);
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut engine = bare_engine();
        for _ in 0..4 {
            assert!(!engine.tick().unwrap().terminated());
        }
        let outcome = engine.tick().unwrap();

        assert_eq!(outcome.collision, Some(MoveError::OutOfBounds(Position::new(10, 5))));
        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(!engine.snake().is_alive());
        assert!(engine.tick().is_none());
    }

    #[test]
    fn test_self_collision() {
        let config = GameConfig {
            initial_snake_length: 5,
            max_food_count: 0,
            max_element_food_count: 0,
            ..GameConfig::small()
        };
        let mut engine = engine_with(config);
        engine.start();

        // Body (5,5)..(1,5); turning down, left, then up lands on the body
        let interval = engine.state().move_interval();
        let mut last = None;
        for direction in [Direction::Down, Direction::Left, Direction::Up] {
            assert!(engine.change_direction(direction));
            last = engine.update(interval);
        }

        let collision = last.and_then(|o| o.collision);
        assert_eq!(collision, Some(MoveError::SelfCollision(Position::new(4, 5))));
        assert_eq!(engine.phase(), Phase::GameOver);
    }

    #[test]
    fn test_tick_applies_buffered_turn() {
        let mut engine = bare_engine();
        assert!(engine.change_direction(Direction::Down));

        let outcome = engine.tick().unwrap();
        assert_eq!(outcome.head, Some(Position::new(5, 6)));
        assert_eq!(engine.state().direction(), Direction::Down);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = bare_engine();
        assert!(!engine.change_direction(Direction::Left));
        engine.tick().unwrap();
        assert_eq!(engine.state().direction(), Direction::Right);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let mut engine = bare_engine();
        engine.toggle_pause();
        assert!(engine.update(Duration::from_secs(1)).is_none());
        engine.toggle_pause();
        assert!(engine.update(Duration::from_secs(1)).is_some());
    }

    #[test]
    fn test_reset_rebuilds_board() {
        let mut engine = engine_with(GameConfig::small());
        engine.start();
        while engine.tick().is_some_and(|o| !o.terminated()) {}
        assert_eq!(engine.phase(), Phase::GameOver);

        engine.reset();
        assert_eq!(engine.phase(), Phase::Menu);
        assert_eq!(engine.score(), 0);
        assert!(engine.snake().is_alive());
        assert_eq!(engine.snake().len(), 3);
        assert!(engine.active_effects().is_empty());
        assert_eq!(engine.element_history().len(), 0);
        assert!(engine.last_reaction().is_none());
        assert_eq!(engine.foods().count(), 5);
        assert_eq!(engine.elements().count(), 2);

        engine.restart();
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn test_no_two_entities_share_a_cell() {
        let config = GameConfig {
            max_food_count: 8,
            max_element_food_count: 4,
            ..GameConfig::small()
        };
        let mut engine = engine_with(config);
        engine.start();

        let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];
        let mut rows = HashSet::new();
        let mut columns = HashSet::new();
        for step in 0..400 {
            if step % 3 == 0 {
                engine.change_direction(turns[(step / 3) % turns.len()]);
            }
            if engine.tick().is_none() {
                engine.restart();
            }
            if let Some(head) = engine.snake().head() {
                rows.insert(head.y);
                columns.insert(head.x);
            }

            let cells = occupied_cells(&engine);
            let unique: HashSet<_> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len(), "overlap at step {step}");
        }

        // The snake really turned instead of running along its starting row
        assert!(rows.len() > 1);
        assert!(columns.len() > 1);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let a = engine_with(GameConfig::small());
        let b = engine_with(GameConfig::small());
        assert_eq!(occupied_cells(&a), occupied_cells(&b));
    }
}
