//! Text Animation Editor WASM API
//!
//! JavaScript-facing classes for the editor and gallery pages.
//!
//! # Module Structure
//!
//! - `helpers`: logging macros, serialization and error conversion
//! - `browser`: clock, fetch, localStorage and file downloads
//! - `editor`: `AnimationEditor`, the editor page
//! - `player`: `AnimationPlayer`, a standalone preview
//! - `gallery`: `GalleryView`, the gallery page

pub mod helpers;
pub mod browser;
pub mod editor;
pub mod player;
pub mod gallery;

pub use editor::AnimationEditor;
pub use gallery::GalleryView;
pub use player::AnimationPlayer;
