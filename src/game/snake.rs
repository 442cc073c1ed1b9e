use std::collections::VecDeque;

use super::action::Direction;
use super::state::Cell;

/// The snake in the game
///
/// Body segments are stored head first. Every segment follows its
/// predecessor on each step, which on a deque is a push at the front and a
/// pop at the back.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    /// Cell the tail left on the most recent step, consumed by `grow`
    vacated: Option<Cell>,
    /// Segments still to be added, one per upcoming step
    pending_growth: usize,
}

impl Snake {
    /// Create a snake whose body trails behind `head`, opposite to `facing`
    pub fn new(head: Cell, length: usize, facing: Direction) -> Self {
        let back = facing.opposite();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut cell = head;
        body.push_back(cell);
        for _ in 1..length {
            cell = cell.moved_in_direction(back);
            body.push_back(cell);
        }

        Self {
            body,
            vacated: None,
            pending_growth: 0,
        }
    }

    /// Build a snake from explicit cells, head first. Returns `None` if the
    /// cells are empty or overlap.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        let snake = Self {
            body,
            vacated: None,
            pending_growth: 0,
        };
        if snake.has_overlap() {
            return None;
        }
        Some(snake)
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn pending_growth(&self) -> usize {
        self.pending_growth
    }

    /// Direction from the neck to the head, `None` for a lone head
    pub fn facing(&self) -> Option<Direction> {
        let neck = *self.body.get(1)?;
        let head = self.head();
        Direction::ALL
            .into_iter()
            .find(|d| neck.moved_in_direction(*d) == head)
    }

    /// Where the head would be after one step in `direction`
    pub fn next_head(&self, direction: Direction) -> Cell {
        self.head().moved_in_direction(direction)
    }

    /// Commit a move: every segment takes its predecessor's cell and the head
    /// becomes `new_head`. A deferred growth segment keeps the tail in place.
    pub fn step(&mut self, new_head: Cell) {
        self.body.push_front(new_head);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
            self.vacated = None;
        } else {
            self.vacated = self.body.pop_back();
        }
    }

    /// Append one segment where the tail was before the latest step.
    ///
    /// Must be called right after the step that caused the growth. If that
    /// cell has already been reused the segment is added on the next step.
    pub fn grow(&mut self) {
        match self.vacated.take() {
            Some(cell) if !self.body.contains(&cell) => self.body.push_back(cell),
            _ => self.pending_growth += 1,
        }
    }

    /// Bonus growth: the first segment lands now, the rest one per step
    pub fn grow_by(&mut self, segments: usize) {
        if segments == 0 {
            return;
        }
        self.grow();
        self.pending_growth += segments - 1;
    }

    /// True iff `candidate` hits the body. The tail is a legal target when it
    /// moves away this same step.
    pub fn collides_with_self(&self, candidate: Cell) -> bool {
        let tail_vacates = self.pending_growth == 0;
        self.hits_body(candidate, tail_vacates)
    }

    /// Self collision for a move that also grows the snake, so the tail stays
    pub fn collides_with_self_growing(&self, candidate: Cell) -> bool {
        self.hits_body(candidate, false)
    }

    fn hits_body(&self, candidate: Cell, tail_vacates: bool) -> bool {
        let checked = if tail_vacates && self.body.len() > 1 {
            self.body.len() - 1
        } else {
            self.body.len()
        };
        self.body.iter().take(checked).any(|cell| *cell == candidate)
    }

    /// True iff two segments share a cell
    pub fn has_overlap(&self) -> bool {
        self.body
            .iter()
            .enumerate()
            .any(|(i, cell)| self.body.iter().skip(i + 1).any(|other| other == cell))
    }
}
