//! Editor components built on the grid model
//!
//! - `editable`: a grid with selection and keyboard editing
//! - `player`: timed playback of a frame sequence
//! - `collection`: the ordered set of editable grids
//! - `controller`: the editor page's state and operations
//! - `gallery`: the browsing page

pub mod collection;
pub mod controller;
pub mod editable;
pub mod gallery;
pub mod player;

pub use collection::{CollectionManager, MoveDirection, NavigationState};
pub use controller::AppController;
pub use editable::{EditableGrid, KeyOutcome};
pub use gallery::{Gallery, GalleryEntry};
pub use player::{FramePlayer, PlaybackTimer};
