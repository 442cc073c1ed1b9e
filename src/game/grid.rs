//! Board geometry: which cells are playable and which are free
//!
//! The board is centered on the origin cell. A cell's pixel position is its
//! coordinate times the grid unit; a cell is playable when that position lies
//! strictly inside the board rectangle shrunk by the wall margin.

use super::config::GameConfig;
use super::snake::Snake;
use super::state::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Pixel distance from the origin to the wall on the x axis
    limit_x: i32,
    /// Pixel distance from the origin to the wall on the y axis
    limit_y: i32,
    unit: i32,
    spawn_inset: i32,
}

impl Grid {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            limit_x: (config.board_width / 2) as i32 - config.wall_margin as i32,
            limit_y: (config.board_height / 2) as i32 - config.wall_margin as i32,
            unit: config.grid_unit.max(1) as i32,
            spawn_inset: config.spawn_inset as i32,
        }
    }

    /// True iff the cell lies strictly inside the walls
    pub fn in_bounds(&self, cell: Cell) -> bool {
        let px = cell.x * self.unit;
        let py = cell.y * self.unit;
        -self.limit_x < px && px < self.limit_x && -self.limit_y < py && py < self.limit_y
    }

    /// True iff the cell is covered by any snake segment
    pub fn is_occupied(&self, cell: Cell, snake: &Snake) -> bool {
        snake.contains(cell)
    }

    /// Largest in-bounds cell coordinate on each axis; the board is symmetric
    /// so the smallest is the negation. `None` when nothing is playable.
    pub fn max_cell(&self) -> Option<(i32, i32)> {
        if self.limit_x <= 0 || self.limit_y <= 0 {
            return None;
        }
        Some((
            (self.limit_x - 1).div_euclid(self.unit),
            (self.limit_y - 1).div_euclid(self.unit),
        ))
    }

    /// Number of playable columns and rows
    pub fn dimensions(&self) -> (usize, usize) {
        match self.max_cell() {
            Some((mx, my)) => ((2 * mx + 1) as usize, (2 * my + 1) as usize),
            None => (0, 0),
        }
    }

    /// Map a cell that left the board to the opposite edge
    pub fn wrap(&self, cell: Cell) -> Cell {
        let Some((mx, my)) = self.max_cell() else {
            return cell;
        };
        let wrap_axis = |v: i32, max: i32| (v + max).rem_euclid(2 * max + 1) - max;
        Cell::new(wrap_axis(cell.x, mx), wrap_axis(cell.y, my))
    }

    /// Grid-aligned cells consumables may be placed on, row by row
    pub fn spawn_cells(&self) -> impl Iterator<Item = Cell> {
        let (sx, sy) = match self.max_cell() {
            Some((mx, my)) => (mx - self.spawn_inset, my - self.spawn_inset),
            None => (-1, -1),
        };
        (-sy..=sy).flat_map(move |y| (-sx..=sx).map(move |x| Cell::new(x, y)))
    }

    /// Count of cells in [`Grid::spawn_cells`]
    pub fn spawn_cell_count(&self) -> usize {
        match self.max_cell() {
            Some((mx, my)) => {
                let sx = mx - self.spawn_inset;
                let sy = my - self.spawn_inset;
                if sx < 0 || sy < 0 {
                    0
                } else {
                    ((2 * sx + 1) * (2 * sy + 1)) as usize
                }
            }
            None => 0,
        }
    }

    /// The n-th spawn cell in row-major order
    pub fn spawn_cell(&self, index: usize) -> Option<Cell> {
        let (mx, my) = self.max_cell()?;
        let sx = mx - self.spawn_inset;
        let sy = my - self.spawn_inset;
        if sx < 0 || sy < 0 || index >= self.spawn_cell_count() {
            return None;
        }
        let width = (2 * sx + 1) as usize;
        Some(Cell::new(
            (index % width) as i32 - sx,
            (index / width) as i32 - sy,
        ))
    }
}
