//! Text Animation Editor WASM Module
//!
//! Character-grid frames, timed preview playback, and the JSON animation
//! document format, for an editor page and a gallery page.

pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod models;
pub mod render;
pub mod storage;
pub mod api;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editor::{AppController, CollectionManager, EditableGrid, FramePlayer, Gallery};
pub use error::{AnimError, AnimResult};
pub use models::{AnimationRecord, FrameRecord, Grid, GridId, SelectionState};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialized: {}", e).into());
    }

    log::info!("Text animation editor WASM module initialized");
}
