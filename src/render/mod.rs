//! HTML projection of grids, editor frames and gallery cards

pub mod template;

pub use template::{render_editor_frames, render_frame_container, render_gallery, render_grid_table};
