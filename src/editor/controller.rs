//! Application controller
//!
//! Owns the editor grids, the preview player and the single selection, and
//! turns page events into operations on them. Grid change notifications are
//! queued while an operation runs and handled before it returns: the preview's
//! frames are re-snapshotted and the page is marked as having unsaved changes.

use crate::config::EditorConfig;
use crate::error::{AnimError, AnimResult};
use crate::events::{ChangeBus, ChangeQueue};
use crate::models::{AnimationRecord, GridId, GridView, Key, SelectionState};
use crate::storage::handoff::peek_pending;
use crate::storage::{local, remote, PendingStore, SaveRequest};

use super::collection::{CollectionManager, MoveDirection, NavigationState};
use super::editable::KeyOutcome;
use super::player::FramePlayer;

#[derive(Debug)]
pub struct AppController {
    config: EditorConfig,
    frames: CollectionManager,
    preview: FramePlayer,
    selection: SelectionState,
    changes: ChangeQueue,
    unsaved_changes: bool,
}

impl AppController {
    pub fn new(config: EditorConfig) -> AnimResult<Self> {
        config.validate()?;
        let bus = ChangeBus::new();
        let changes = ChangeQueue::attach(&bus);
        let frames = CollectionManager::new(config.grid_width, config.grid_height, config.editor_scale, bus);
        let preview = FramePlayer::new(
            config.grid_width,
            config.grid_height,
            config.preview_scale,
            Vec::new(),
            config.default_fps,
        );
        Ok(Self {
            config,
            frames,
            preview,
            selection: SelectionState::new(),
            changes,
            unsaved_changes: false,
        })
    }

    /// Create the initial grids and start the preview
    pub fn start(&mut self, now_ms: f64) {
        self.frames.initialize(self.config.initial_frames);
        self.sync();
        self.preview.play(now_ms);
        self.unsaved_changes = false;
        log::info!("Editor started with {} frames", self.frames.len());
    }

    /// Handle queued change notifications; true if there were any
    fn sync(&mut self) -> bool {
        if self.changes.drain().is_empty() {
            return false;
        }
        match self.preview.set_frames(self.frames.snapshot_all()) {
            Ok(()) => self.unsaved_changes = true,
            Err(e) => log::error!("Error updating frames: {}", e),
        }
        true
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn frames(&self) -> &CollectionManager {
        &self.frames
    }

    pub fn preview(&self) -> &FramePlayer {
        &self.preview
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    /// Leaving the page or clearing must be confirmed while edits are unsaved
    pub fn needs_confirmation(&self) -> bool {
        self.unsaved_changes
    }

    // ------------------------------------------------------------------------
    // Selection and keyboard
    // ------------------------------------------------------------------------

    pub fn click_cell(&mut self, id: GridId, x: usize, y: usize) -> bool {
        match self.frames.get(id) {
            Some(grid) => grid.select(&mut self.selection, x, y),
            None => false,
        }
    }

    /// A click anywhere that is not a cell
    pub fn click_outside(&mut self) {
        self.selection.clear();
    }

    /// Route a key press to whichever grid owns the selection
    pub fn key_down(&mut self, key: Key) -> KeyOutcome {
        let Some(owner) = self.selection.owner() else {
            return KeyOutcome::Ignored;
        };
        let outcome = match self.frames.get_mut(owner) {
            Some(grid) => grid.handle_key(&mut self.selection, key),
            None => {
                self.selection.clear();
                KeyOutcome::Ignored
            }
        };
        self.sync();
        outcome
    }

    pub fn set_cell(&mut self, id: GridId, x: usize, y: usize, text: &str) -> bool {
        let written = self
            .frames
            .get_mut(id)
            .map(|grid| grid.set_cell(x, y, text))
            .unwrap_or(false);
        self.sync();
        written
    }

    // ------------------------------------------------------------------------
    // Frame list
    // ------------------------------------------------------------------------

    pub fn add_frame(&mut self) -> GridId {
        let added = self.frames.add_grids(1);
        self.sync();
        added[0]
    }

    pub fn delete_frame(&mut self, id: GridId) -> AnimResult<()> {
        if !self.frames.delete_grid(id, 1, &mut self.selection) {
            return Err(AnimError::UnknownGrid(id));
        }
        self.sync();
        Ok(())
    }

    /// Duplicate `id` into a new frame right after it
    pub fn copy_frame(&mut self, id: GridId) -> AnimResult<GridId> {
        let copy = self
            .frames
            .copy_grid(id, &mut self.selection)
            .ok_or(AnimError::UnknownGrid(id))?;
        self.sync();
        Ok(copy)
    }

    /// Swap with a neighbour; false at either end of the list
    pub fn move_frame(&mut self, id: GridId, direction: MoveDirection) -> bool {
        let moved = self.frames.swap_grid(id, direction, &mut self.selection);
        self.sync();
        moved
    }

    // ------------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------------

    pub fn set_fps(&mut self, fps: f64, now_ms: f64) -> AnimResult<()> {
        self.preview.set_fps(fps, now_ms)
    }

    pub fn poll(&mut self, now_ms: f64) -> u64 {
        self.preview.poll(now_ms)
    }

    // ------------------------------------------------------------------------
    // Load / save
    // ------------------------------------------------------------------------

    /// Put a validated document into the editor and restart the preview
    pub fn load_animation(&mut self, record: &AnimationRecord, now_ms: f64) {
        self.frames.load_frames(record.frames(), &mut self.selection);
        self.sync();
        if let Err(e) = self.preview.set_fps(record.fps(), now_ms) {
            log::error!("Rejected fps from a validated document: {}", e);
        }
        log::info!(
            "Loaded animation: {} frames at {} fps",
            record.frames().len(),
            record.fps()
        );
    }

    /// Parse and load a document; a rejected document leaves the editor untouched
    pub fn import_document(&mut self, text: &str, now_ms: f64) -> AnimResult<()> {
        let record = AnimationRecord::from_json(text)?;
        self.load_animation(&record, now_ms);
        Ok(())
    }

    /// Current frames and rate as a document
    pub fn export_record(&self) -> AnimResult<AnimationRecord> {
        AnimationRecord::new(self.preview.fps(), self.frames.snapshot_all())
    }

    pub fn export_document(&self) -> AnimResult<String> {
        Ok(self.export_record()?.to_json())
    }

    /// Name for a downloaded copy of the current animation
    pub fn local_file_name(&self) -> String {
        local::export_file_name_now()
    }

    pub fn save_request(&self, name: Option<&str>) -> AnimResult<SaveRequest> {
        Ok(remote::save_request(&self.config, name, &self.export_record()?))
    }

    /// Apply an animation handed over by the gallery page, if there is one
    ///
    /// The stored copy is removed only after it has been applied; a corrupt
    /// entry is reported and left in place.
    pub fn apply_pending(&mut self, store: &mut dyn PendingStore, now_ms: f64) -> AnimResult<bool> {
        let key = self.config.pending_key.clone();
        let Some(record) = peek_pending(store, &key)? else {
            return Ok(false);
        };
        self.load_animation(&record, now_ms);
        self.unsaved_changes = false;
        store.remove_item(&key)?;
        Ok(true)
    }

    /// Reset to the start-up state: blank frames at the default rate
    pub fn clear_animation(&mut self, now_ms: f64) -> AnimResult<()> {
        let blank = AnimationRecord::blank(
            self.config.default_fps,
            self.config.grid_width,
            self.config.grid_height,
            self.config.initial_frames,
        )?;
        self.load_animation(&blank, now_ms);
        self.unsaved_changes = false;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------------

    pub fn render_frames(&self) -> Vec<GridView> {
        self.frames
            .grids()
            .iter()
            .map(|grid| grid.render(&self.selection))
            .collect()
    }

    pub fn render_preview(&self) -> GridView {
        self.preview.render()
    }

    pub fn navigation(&self) -> Vec<NavigationState> {
        self.frames.navigation()
    }
}
