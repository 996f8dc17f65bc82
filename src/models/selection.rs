//! Selection and keyboard input
//!
//! Only one cell in the whole editor can be selected at a time. The selection
//! is an explicit value owned by the controller and lent to grids that need it.

use serde::{Deserialize, Serialize};

use super::grid::GridId;

/// A cell in a particular grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub grid: GridId,
    pub x: usize,
    pub y: usize,
}

/// Single-focus selection shared by every editable grid
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<CellRef>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<CellRef> {
        self.selected
    }

    /// Select a cell, replacing any previous selection
    pub fn select(&mut self, cell: CellRef) {
        self.selected = Some(cell);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if it points into `grid`
    pub fn release(&mut self, grid: GridId) {
        if self.owner() == Some(grid) {
            self.selected = None;
        }
    }

    pub fn owner(&self) -> Option<GridId> {
        self.selected.map(|cell| cell.grid)
    }

    /// Selected coordinates, if the selection belongs to `grid`
    pub fn position_in(&self, grid: GridId) -> Option<(usize, usize)> {
        self.selected
            .filter(|cell| cell.grid == grid)
            .map(|cell| (cell.x, cell.y))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Keys the editor reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A single printable character
    Char(char),
    Backspace,
    Arrow(Direction),
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Key::Char(c);
        }
        match key {
            "Backspace" => Key::Backspace,
            "ArrowUp" => Key::Arrow(Direction::Up),
            "ArrowDown" => Key::Arrow(Direction::Down),
            "ArrowLeft" => Key::Arrow(Direction::Left),
            "ArrowRight" => Key::Arrow(Direction::Right),
            _ => Key::Other,
        }
    }

    /// Arrow keys scroll the page unless the default action is prevented
    pub fn prevents_default(&self) -> bool {
        matches!(self, Key::Arrow(_))
    }
}
