//! Collection manager
//!
//! Owns the editor's grids in visual order. List order is the left-to-right
//! order on the page and the animation's frame order. There is always at least
//! one grid: deleting the last one clears it instead.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::editable::EditableGrid;
use crate::events::{ChangeBus, GridChanged};
use crate::models::{FrameRecord, GridId, SelectionState};

/// Neighbour to swap with
#[repr(i8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
pub enum MoveDirection {
    Previous = -1,
    Next = 1,
}

impl MoveDirection {
    pub fn from_offset(offset: i32) -> Option<Self> {
        match offset {
            -1 => Some(Self::Previous),
            1 => Some(Self::Next),
            _ => None,
        }
    }

    fn apply(self, index: usize) -> Option<usize> {
        match self {
            Self::Previous => index.checked_sub(1),
            Self::Next => index.checked_add(1),
        }
    }
}

/// Which move buttons a frame container should enable
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub grid: GridId,
    pub can_move_previous: bool,
    pub can_move_next: bool,
}

#[derive(Debug)]
pub struct CollectionManager {
    width: usize,
    height: usize,
    scale: f64,
    grids: Vec<EditableGrid>,
    next_id: u32,
    bus: ChangeBus,
}

impl CollectionManager {
    /// An empty manager; call `initialize` before use
    pub fn new(width: usize, height: usize, scale: f64, bus: ChangeBus) -> Self {
        Self {
            width,
            height,
            scale,
            grids: Vec::new(),
            next_id: 1,
            bus,
        }
    }

    pub fn initialize(&mut self, count: usize) -> Vec<GridId> {
        self.add_grids(count)
    }

    /// New grids take the size of the frames already present, so a loaded
    /// animation with a non-default size stays uniform
    fn create_grid(&mut self) -> EditableGrid {
        let id = GridId(self.next_id);
        self.next_id += 1;
        let (width, height) = self
            .grids
            .first()
            .map(|g| (g.grid().width(), g.grid().height()))
            .unwrap_or((self.width, self.height));
        let mut grid = EditableGrid::new(id, width, height, self.scale);
        grid.attach(self.bus.clone());
        grid
    }

    /// Append `count` blank grids; one change notification per new grid
    pub fn add_grids(&mut self, count: usize) -> Vec<GridId> {
        let mut added = Vec::with_capacity(count);
        for _ in 0..count {
            let grid = self.create_grid();
            let id = grid.id();
            self.grids.push(grid);
            self.bus.publish(GridChanged { grid: id });
            added.push(id);
        }
        log::debug!("Added {} grid(s), {} total", count, self.grids.len());
        added
    }

    /// Remove `count` grids starting at `id`'s position
    ///
    /// When a single grid remains it is cleared in place instead. Returns false
    /// if `id` is not managed here.
    pub fn delete_grid(&mut self, id: GridId, count: usize, selection: &mut SelectionState) -> bool {
        let Some(index) = self.index_of(id) else {
            log::warn!("delete_grid: grid {} not found", id);
            return false;
        };

        for _ in 0..count {
            if self.grids.len() == 1 {
                self.grids[0].clear(selection);
                continue;
            }
            let at = index.min(self.grids.len() - 1);
            let removed = self.grids.remove(at);
            selection.release(removed.id());
            self.bus.publish(GridChanged { grid: removed.id() });
        }
        true
    }

    /// Exchange content (not identity) with the neighbour in `direction`
    ///
    /// No-op when the neighbour does not exist.
    pub fn swap_grid(&mut self, id: GridId, direction: MoveDirection, selection: &mut SelectionState) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let Some(neighbour) = direction.apply(index).filter(|&n| n < self.grids.len()) else {
            return false;
        };

        let ours = self.grids[index].serialize();
        let theirs = self.grids[neighbour].serialize();
        self.grids[neighbour].deserialize(&ours, selection);
        self.grids[index].deserialize(&theirs, selection);
        true
    }

    /// Insert a copy of `id` directly after it
    pub fn copy_grid(&mut self, id: GridId, selection: &mut SelectionState) -> Option<GridId> {
        let index = self.index_of(id)?;
        let content = self.grids[index].serialize();
        let mut copy = self.create_grid();
        copy.deserialize(&content, selection);
        let copy_id = copy.id();
        self.grids.insert(index + 1, copy);
        Some(copy_id)
    }

    /// Snapshot of every grid in order: the current frame sequence
    pub fn snapshot_all(&self) -> Vec<FrameRecord> {
        self.grids.iter().map(EditableGrid::serialize).collect()
    }

    /// Grow (append blank grids) or shrink (drop from the front) to `count`
    /// grids, then copy `frames` into them in order
    pub fn load_frames(&mut self, frames: &[FrameRecord], selection: &mut SelectionState) {
        let target = frames.len().max(1);
        if self.grids.len() < target {
            self.add_grids(target - self.grids.len());
        }
        while self.grids.len() > target {
            let first = self.grids[0].id();
            self.delete_grid(first, 1, selection);
        }
        for (grid, frame) in self.grids.iter_mut().zip(frames) {
            grid.deserialize(frame, selection);
        }
    }

    pub fn index_of(&self, id: GridId) -> Option<usize> {
        self.grids.iter().position(|g| g.id() == id)
    }

    /// Grid mounted in the DOM container with this id
    pub fn find_by_element(&self, element_id: &str) -> Option<GridId> {
        self.grids
            .iter()
            .find(|g| g.element_id() == element_id)
            .map(EditableGrid::id)
    }

    pub fn get(&self, id: GridId) -> Option<&EditableGrid> {
        self.grids.iter().find(|g| g.id() == id)
    }

    pub fn get_mut(&mut self, id: GridId) -> Option<&mut EditableGrid> {
        self.grids.iter_mut().find(|g| g.id() == id)
    }

    pub fn grids(&self) -> &[EditableGrid] {
        &self.grids
    }

    pub fn ids(&self) -> Vec<GridId> {
        self.grids.iter().map(EditableGrid::id).collect()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Move-button state per position: the first grid cannot move back, the
    /// last cannot move forward
    pub fn navigation(&self) -> Vec<NavigationState> {
        let last = self.grids.len().saturating_sub(1);
        self.grids
            .iter()
            .enumerate()
            .map(|(i, g)| NavigationState {
                grid: g.id(),
                can_move_previous: i > 0,
                can_move_next: i < last,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangeQueue;

    fn setup(count: usize) -> (CollectionManager, SelectionState, ChangeQueue) {
        let bus = ChangeBus::new();
        let queue = ChangeQueue::attach(&bus);
        let mut manager = CollectionManager::new(4, 2, 1.0, bus);
        manager.initialize(count);
        queue.drain();
        (manager, SelectionState::new(), queue)
    }

    fn mark(manager: &mut CollectionManager, index: usize, text: &str) {
        let id = manager.ids()[index];
        manager.get_mut(id).unwrap().set_cell(0, 0, text);
    }

    fn marks(manager: &CollectionManager) -> Vec<String> {
        manager
            .snapshot_all()
            .iter()
            .map(|f| f.cells()[0].clone())
            .collect()
    }

    #[test]
    fn test_add_grids_notifies_each() {
        let (mut manager, _sel, queue) = setup(1);
        let added = manager.add_grids(2);
        assert_eq!(added.len(), 2);
        assert_eq!(manager.len(), 3);
        assert_eq!(queue.drain(), added);
    }

    #[test]
    fn test_snapshot_order() {
        let (mut manager, _sel, _queue) = setup(3);
        for (i, c) in ["A", "B", "C"].iter().enumerate() {
            mark(&mut manager, i, c);
        }
        assert_eq!(marks(&manager), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_swap_is_its_own_inverse() {
        let (mut manager, mut sel, queue) = setup(2);
        mark(&mut manager, 0, "A");
        mark(&mut manager, 1, "B");
        let first = manager.ids()[0];
        let second = manager.ids()[1];
        queue.drain();

        assert!(manager.swap_grid(first, MoveDirection::Next, &mut sel));
        assert_eq!(marks(&manager), vec!["B", "A"]);
        let mut notified = queue.drain();
        notified.sort();
        assert_eq!(notified, vec![first, second]);

        assert!(manager.swap_grid(second, MoveDirection::Previous, &mut sel));
        assert_eq!(marks(&manager), vec!["A", "B"]);
        // identities stay in place
        assert_eq!(manager.ids(), vec![first, second]);
    }

    #[test]
    fn test_swap_past_edge_is_noop() {
        let (mut manager, mut sel, queue) = setup(2);
        let first = manager.ids()[0];
        let last = manager.ids()[1];
        assert!(!manager.swap_grid(first, MoveDirection::Previous, &mut sel));
        assert!(!manager.swap_grid(last, MoveDirection::Next, &mut sel));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_delete_last_grid_clears_it() {
        let (mut manager, mut sel, _queue) = setup(1);
        mark(&mut manager, 0, "X");
        let only = manager.ids()[0];

        assert!(manager.delete_grid(only, 1, &mut sel));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.ids(), vec![only]);
        assert_eq!(marks(&manager), vec![" "]);

        manager.delete_grid(only, 5, &mut sel);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_delete_many_stops_at_one() {
        let (mut manager, mut sel, queue) = setup(3);
        let second = manager.ids()[1];
        manager.delete_grid(second, 5, &mut sel);
        assert_eq!(manager.len(), 1);
        // two removals, then the survivor is cleared three times
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn test_delete_releases_selection() {
        let (mut manager, mut sel, _queue) = setup(2);
        let second = manager.ids()[1];
        manager.get(second).unwrap().select(&mut sel, 1, 1);
        manager.delete_grid(second, 1, &mut sel);
        assert!(sel.selected().is_none());
        assert!(manager.index_of(second).is_none());
    }

    #[test]
    fn test_copy_inserts_after_source() {
        let (mut manager, mut sel, _queue) = setup(3);
        for (i, c) in ["A", "B", "C"].iter().enumerate() {
            mark(&mut manager, i, c);
        }
        let first = manager.ids()[0];
        let copy = manager.copy_grid(first, &mut sel).unwrap();

        assert_eq!(marks(&manager), vec!["A", "A", "B", "C"]);
        assert_eq!(manager.index_of(copy), Some(1));
    }

    #[test]
    fn test_lookup_by_element() {
        let (manager, _sel, _queue) = setup(2);
        let second = manager.ids()[1];
        let element = manager.get(second).unwrap().element_id();
        assert_eq!(manager.find_by_element(&element), Some(second));
        assert_eq!(manager.find_by_element("frame-999"), None);
    }

    #[test]
    fn test_navigation_affordances() {
        let (manager, _sel, _queue) = setup(3);
        let nav = manager.navigation();
        assert!(!nav[0].can_move_previous && nav[0].can_move_next);
        assert!(nav[1].can_move_previous && nav[1].can_move_next);
        assert!(nav[2].can_move_previous && !nav[2].can_move_next);

        let (single, _sel, _queue) = setup(1);
        let nav = single.navigation();
        assert!(!nav[0].can_move_previous && !nav[0].can_move_next);
    }

    #[test]
    fn test_new_grids_match_loaded_size() {
        let (mut manager, mut sel, _queue) = setup(1);
        manager.load_frames(&[FrameRecord::blank(3, 3)], &mut sel);
        let added = manager.add_grids(1)[0];
        assert_eq!(manager.get(added).unwrap().grid().width(), 3);
        assert_eq!(manager.snapshot_all()[1], FrameRecord::blank(3, 3));
    }

    #[test]
    fn test_load_frames_resizes() {
        let (mut manager, mut sel, _queue) = setup(3);
        let first = manager.ids()[0];
        let frames: Vec<_> = ["p", "q"]
            .iter()
            .map(|c| {
                let mut cells = vec![" ".to_string(); 8];
                cells[0] = c.to_string();
                FrameRecord::new(4, 2, cells).unwrap()
            })
            .collect();

        manager.load_frames(&frames, &mut sel);

        assert_eq!(manager.len(), 2);
        // shrinking drops from the front
        assert!(manager.index_of(first).is_none());
        assert_eq!(marks(&manager), vec!["p", "q"]);

        manager.load_frames(&[frames[0].clone(), frames[1].clone(), frames[0].clone()], &mut sel);
        assert_eq!(marks(&manager), vec!["p", "q", "p"]);
    }
}
