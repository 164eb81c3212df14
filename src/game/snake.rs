use super::direction::Direction;
use super::food::FoodTag;
use super::list::EntityList;
use super::spawn::Occupancy;
use super::state::Position;
use crate::error::MoveError;

/// One body cell of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub position: Position,
    /// Render selector; body segments are always plain for now
    pub tag: FoodTag,
}

impl Segment {
    fn plain(position: Position) -> Self {
        Self {
            position,
            tag: FoodTag::PLAIN,
        }
    }
}

/// The snake: an ordered body, head first.
///
/// A snake is either alive or dead. Death is terminal; a new game builds a new
/// snake.
#[derive(Debug, Clone)]
pub struct Snake {
    body: EntityList<Segment>,
    alive: bool,
}

impl Snake {
    /// Build a snake of `length` segments with its head at `head`, the body
    /// trailing behind it away from `facing`.
    pub fn new(head: Position, facing: Direction, length: usize) -> Self {
        let mut body = EntityList::with_capacity(length);
        let (back_dx, back_dy) = facing.opposite().delta();

        let mut pos = head;
        for _ in 0..length {
            body.push_back(Segment::plain(pos));
            pos = pos.moved_by(back_dx, back_dy);
        }

        Self { body, alive: true }
    }

    pub fn head(&self) -> Option<Position> {
        self.body.front().map(|s| s.position)
    }

    pub fn tail(&self) -> Option<Position> {
        self.body.back().map(|s| s.position)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Body segments from head to tail
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Segment> + '_ {
        self.body.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().map(|s| s.position)
    }

    /// Step the head one cell in `direction` on a `grid_width` x `grid_height`
    /// grid and return the new head position.
    ///
    /// Leaving the grid or running into the body kills the snake. The tail only
    /// counts as free when the snake is not growing this step, because only then
    /// does it vacate its cell.
    pub fn advance(
        &mut self,
        direction: Direction,
        grid_width: usize,
        grid_height: usize,
        should_grow: bool,
    ) -> Result<Position, MoveError> {
        if !self.alive {
            return Err(MoveError::NotAlive);
        }
        let head = self.head().ok_or(MoveError::Empty)?;
        let next = head.moved_in_direction(direction);

        if !next.in_bounds(grid_width, grid_height) {
            self.alive = false;
            return Err(MoveError::OutOfBounds(next));
        }

        let tail_id = self.body.back_id();
        let blocked = self
            .body
            .iter_with_ids()
            .filter(|(id, _)| should_grow || Some(*id) != tail_id)
            .any(|(_, segment)| segment.position == next);
        if blocked {
            self.alive = false;
            return Err(MoveError::SelfCollision(next));
        }

        self.body.push_front(Segment::plain(next));
        if !should_grow {
            self.body.pop_back();
        }

        Ok(next)
    }

    /// True if any segment occupies `pos`
    pub fn check_collision(&self, pos: Position) -> bool {
        self.body.iter().any(|s| s.position == pos)
    }

    /// True if the head shares its cell with any other segment
    pub fn check_self_collision(&self) -> bool {
        let Some(head) = self.head() else {
            return false;
        };
        self.body.iter().skip(1).any(|s| s.position == head)
    }

    /// Drop every segment. The snake is dead afterwards.
    pub fn clear(&mut self) {
        self.body.clear();
        self.alive = false;
    }
}

impl Occupancy for Snake {
    fn occupies(&self, pos: Position) -> bool {
        self.check_collision(pos)
    }
}
