//! Editable grid: a `Grid` plus click selection and keyboard editing
//!
//! The selection is not stored here. Every operation that reads or moves it
//! borrows the controller's `SelectionState`, which keeps at most one cell
//! selected across all grids.

use serde::{Deserialize, Serialize};

use crate::events::ChangeBus;
use crate::models::{CellRef, Direction, FrameRecord, Grid, GridId, GridView, Key, SelectionState, BLANK};

/// What a key press did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyOutcome {
    /// Selected cell content changed (a change notification was sent)
    Edited,
    /// Selection moved to a neighbouring cell
    Moved,
    /// Nothing happened
    Ignored,
}

#[derive(Clone, Debug)]
pub struct EditableGrid {
    grid: Grid,
}

impl EditableGrid {
    pub fn new(id: GridId, width: usize, height: usize, scale: f64) -> Self {
        Self {
            grid: Grid::with_id(id, width, height, scale),
        }
    }

    pub fn attach(&mut self, bus: ChangeBus) {
        self.grid.attach(bus);
    }

    pub fn id(&self) -> GridId {
        self.grid.id()
    }

    /// DOM id of the container this grid is mounted in
    pub fn element_id(&self) -> String {
        format!("frame-{}", self.grid.id().0)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn set_cell(&mut self, x: usize, y: usize, text: &str) -> bool {
        self.grid.set_cell(x, y, text)
    }

    pub fn serialize(&self) -> FrameRecord {
        self.grid.serialize()
    }

    /// Replace content; a selection inside this grid does not survive the rebuild
    pub fn deserialize(&mut self, record: &FrameRecord, selection: &mut SelectionState) {
        selection.release(self.id());
        self.grid.deserialize(record);
    }

    pub fn clear(&mut self, selection: &mut SelectionState) {
        selection.release(self.id());
        self.grid.clear();
    }

    pub fn render(&self, selection: &SelectionState) -> GridView {
        self.grid
            .render_with_selection(selection.position_in(self.id()))
    }

    /// Click on cell `(x, y)`: select it, deselecting whatever was selected before
    pub fn select(&self, selection: &mut SelectionState, x: usize, y: usize) -> bool {
        if !self.grid.contains(x, y) {
            return false;
        }
        selection.select(CellRef { grid: self.id(), x, y });
        true
    }

    /// Apply a key press if this grid owns the selection
    pub fn handle_key(&mut self, selection: &mut SelectionState, key: Key) -> KeyOutcome {
        let Some((x, y)) = selection.position_in(self.id()) else {
            return KeyOutcome::Ignored;
        };

        match key {
            Key::Char(c) => {
                let mut buf = [0u8; 4];
                self.grid.set_cell(x, y, c.encode_utf8(&mut buf));
                KeyOutcome::Edited
            }
            Key::Backspace => {
                self.grid.set_cell(x, y, BLANK);
                KeyOutcome::Edited
            }
            Key::Arrow(direction) => {
                let (nx, ny) = self.neighbour(x, y, direction);
                if (nx, ny) == (x, y) {
                    return KeyOutcome::Ignored;
                }
                selection.select(CellRef { grid: self.id(), x: nx, y: ny });
                KeyOutcome::Moved
            }
            Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Adjacent cell in `direction`, clamped at the edges
    fn neighbour(&self, x: usize, y: usize, direction: Direction) -> (usize, usize) {
        match direction {
            Direction::Up => (x, y.saturating_sub(1)),
            Direction::Down => (x, (y + 1).min(self.grid.height() - 1)),
            Direction::Left => (x.saturating_sub(1), y),
            Direction::Right => ((x + 1).min(self.grid.width() - 1), y),
        }
    }
}
