//! Models module for the animation editor
//!
//! Plain data: grids, frame records, animation documents and selection state.

pub mod animation;
pub mod grid;
pub mod selection;

// Re-export commonly used types
pub use animation::AnimationRecord;
pub use grid::{FrameRecord, Grid, GridId, GridView, ViewCell, BLANK};
pub use selection::{CellRef, Direction, Key, SelectionState};
