//! Gallery of pre-made animations
//!
//! The catalog (`gallery_files.json`) lists document names. Each document gets
//! its own playing `FramePlayer`; choosing one hands it to the editor page via
//! the pending-animation store.

use crate::config::EditorConfig;
use crate::error::{AnimError, AnimResult};
use crate::models::{AnimationRecord, GridView};
use crate::storage::handoff::stash_pending;
use crate::storage::{remote, PendingStore};

use super::player::FramePlayer;

pub const CATALOG_FILE: &str = "gallery_files.json";

#[derive(Debug)]
pub struct GalleryEntry {
    name: String,
    record: AnimationRecord,
    player: FramePlayer,
}

impl GalleryEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record(&self) -> &AnimationRecord {
        &self.record
    }

    pub fn player(&self) -> &FramePlayer {
        &self.player
    }
}

#[derive(Debug)]
pub struct Gallery {
    config: EditorConfig,
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    pub fn new(config: EditorConfig) -> AnimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            entries: Vec::new(),
        })
    }

    /// Names listed in the catalog document
    pub fn parse_catalog(text: &str) -> AnimResult<Vec<String>> {
        let names: Vec<String> = serde_json::from_str(text)?;
        Ok(names)
    }

    pub fn catalog_url(&self) -> String {
        self.config.json_path(CATALOG_FILE)
    }

    pub fn entry_url(&self, name: &str) -> AnimResult<String> {
        remote::document_url(&self.config, name)
    }

    /// Add an entry and start its player; returns the entry's index
    pub fn add_entry(&mut self, name: &str, record: AnimationRecord, now_ms: f64) -> usize {
        let mut player = FramePlayer::new(
            self.config.grid_width,
            self.config.grid_height,
            self.config.editor_scale,
            record.frames().to_vec(),
            record.fps(),
        );
        player.play(now_ms);
        self.entries.push(GalleryEntry {
            name: name.to_string(),
            record,
            player,
        });
        self.entries.len() - 1
    }

    pub fn add_document(&mut self, name: &str, text: &str, now_ms: f64) -> AnimResult<usize> {
        let record = AnimationRecord::from_json(text)?;
        Ok(self.add_entry(name, record, now_ms))
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drive every player; returns the total tick count
    pub fn poll(&mut self, now_ms: f64) -> u64 {
        self.entries
            .iter_mut()
            .fold(0u64, |total, e| total.saturating_add(e.player.poll(now_ms)))
    }

    pub fn render(&self) -> Vec<GridView> {
        self.entries.iter().map(|e| e.player.render()).collect()
    }

    /// Hand entry `index` to the editor page
    pub fn select(&self, index: usize, store: &mut dyn PendingStore) -> AnimResult<()> {
        let entry = self.entries.get(index).ok_or_else(|| {
            AnimError::invalid_animation(format!("no gallery entry at {}", index))
        })?;
        stash_pending(store, &self.config.pending_key, &entry.record)?;
        log::info!("Selected gallery animation '{}'", entry.name);
        Ok(())
    }
}
