//! WASM build test
//!
//! This module tests that the WASM module can be built and the exported
//! classes work in a browser.

use ascii_anim_wasm::api::{AnimationEditor, AnimationPlayer, GalleryView};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const DOC: &str = r#"{"fps": 4, "frames": [
    {"width": 2, "height": 1, "cells": ["a", "b"]},
    {"width": 2, "height": 1, "cells": ["c", "d"]}
]}"#;

fn started_editor() -> AnimationEditor {
    let editor = AnimationEditor::new(JsValue::UNDEFINED).unwrap();
    editor.start();
    editor
}

#[wasm_bindgen_test]
fn test_editor_creation() {
    let editor = started_editor();
    let html = editor.frames_html().unwrap();
    assert_eq!(html.matches("class=\"canvas-container\"").count(), 3);
    assert!(!editor.has_unsaved_changes());
}

#[wasm_bindgen_test]
fn test_editing_through_the_api() {
    let editor = started_editor();
    assert!(editor.click_cell(1, 0, 0));
    assert!(!editor.click_cell(1, -1, 0));
    assert!(!editor.key_down("x"));
    assert!(editor.key_down("ArrowRight"));
    assert!(editor.has_unsaved_changes());
    assert!(editor.export_document().unwrap().contains("\"x\""));
}

#[wasm_bindgen_test]
fn test_frame_list_operations() {
    let editor = started_editor();
    let added = editor.add_frame();
    assert_eq!(added, 4);
    assert_eq!(editor.copy_frame(1).unwrap(), 5);
    assert!(editor.move_frame(1, 1));
    assert!(!editor.move_frame(1, 7));
    assert!(editor.delete_frame(99).is_err());
    editor.delete_frame(added).unwrap();
}

#[wasm_bindgen_test]
fn test_import_rejects_invalid_documents() {
    let editor = started_editor();
    assert!(editor.import_document("{\"fps\": 0, \"frames\": []}").is_err());
    editor.import_document(DOC).unwrap();
    assert_eq!(editor.fps(), 4.0);
    assert!(editor.set_fps(-1.0).is_err());
}

#[wasm_bindgen_test]
fn test_player_loads_document() {
    let player = AnimationPlayer::new(2, 1, 1.0);
    player.load_document(DOC).unwrap();
    assert!(player.is_playing());
    assert!(player.html().unwrap().contains(">a</td>"));
    assert!(player.set_frame(1));
    assert!(!player.set_frame(2));
}

#[wasm_bindgen_test]
fn test_gallery_creation() {
    let gallery = GalleryView::new(JsValue::NULL).unwrap();
    assert_eq!(gallery.length(), 0);
    assert_eq!(gallery.html().unwrap(), "");
}
