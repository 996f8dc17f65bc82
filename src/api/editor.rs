//! The editor page
//!
//! `AnimationEditor` wraps the `AppController` for JavaScript. The host page
//! forwards clicks and key presses, calls `tick()` from `requestAnimationFrame`,
//! and re-reads `framesHtml()`/`previewHtml()` when a call reports a change.
//! Network operations return promises; the controller is never borrowed across
//! an `await`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use super::browser::{self, LocalStorage};
use super::helpers::{coordinate, deserialize_or_default, serialize, to_js_error};
use crate::config::EditorConfig;
use crate::editor::{AppController, KeyOutcome, MoveDirection};
use crate::models::{AnimationRecord, GridId, Key};
use crate::render;
use crate::storage::{local, remote};
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

#[wasm_bindgen]
pub struct AnimationEditor {
    inner: Rc<RefCell<AppController>>,
}

#[wasm_bindgen]
impl AnimationEditor {
    /// Create an editor; `config` may be omitted for the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AnimationEditor, JsValue> {
        let config: EditorConfig = deserialize_or_default(config, "Invalid editor config")?;
        let app = AppController::new(config).map_err(to_js_error)?;
        Ok(AnimationEditor {
            inner: Rc::new(RefCell::new(app)),
        })
    }

    /// Build the initial frames, start the preview and pick up a gallery hand-off
    pub fn start(&self) {
        wasm_info!("start called");
        let now = browser::now_ms();
        let mut app = self.inner.borrow_mut();
        app.start(now);

        match LocalStorage::open() {
            Ok(mut store) => match app.apply_pending(&mut store, now) {
                Ok(true) => wasm_info!("Loaded animation handed over from the gallery"),
                Ok(false) => {}
                Err(e) => wasm_error!("Could not apply pending animation: {}", e),
            },
            Err(e) => wasm_warn!("{}", e),
        }
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Select a cell; returns false when the click missed every cell
    #[wasm_bindgen(js_name = clickCell)]
    pub fn click_cell(&self, grid_id: u32, x: i32, y: i32) -> bool {
        let (Some(x), Some(y)) = (coordinate(x), coordinate(y)) else {
            return false;
        };
        self.inner.borrow_mut().click_cell(GridId(grid_id), x, y)
    }

    /// Like `clickCell`, addressed by the frame's element id
    #[wasm_bindgen(js_name = clickCellInElement)]
    pub fn click_cell_in_element(&self, element_id: &str, x: i32, y: i32) -> bool {
        let id = self.inner.borrow().frames().find_by_element(element_id);
        match id {
            Some(id) => self.click_cell(id.0, x, y),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = clickOutside)]
    pub fn click_outside(&self) {
        self.inner.borrow_mut().click_outside();
    }

    /// Handle a `KeyboardEvent.key`; returns true when the page should call
    /// `preventDefault()`
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: &str) -> bool {
        let key = Key::from_dom(key);
        let mut app = self.inner.borrow_mut();
        let had_selection = app.selection().selected().is_some();
        let outcome = app.key_down(key);
        if outcome != KeyOutcome::Ignored {
            wasm_log!("keyDown {:?}: {:?}", key, outcome);
        }
        had_selection && key.prevents_default()
    }

    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(&self, grid_id: u32, x: i32, y: i32, text: &str) -> bool {
        let (Some(x), Some(y)) = (coordinate(x), coordinate(y)) else {
            return false;
        };
        self.inner.borrow_mut().set_cell(GridId(grid_id), x, y, text)
    }

    // ------------------------------------------------------------------------
    // Frame list
    // ------------------------------------------------------------------------

    /// Append a blank frame; returns its id
    #[wasm_bindgen(js_name = addFrame)]
    pub fn add_frame(&self) -> u32 {
        self.inner.borrow_mut().add_frame().0
    }

    #[wasm_bindgen(js_name = deleteFrame)]
    pub fn delete_frame(&self, grid_id: u32) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .delete_frame(GridId(grid_id))
            .map_err(to_js_error)
    }

    /// Duplicate a frame; returns the copy's id
    #[wasm_bindgen(js_name = copyFrame)]
    pub fn copy_frame(&self, grid_id: u32) -> Result<u32, JsValue> {
        self.inner
            .borrow_mut()
            .copy_frame(GridId(grid_id))
            .map(|id| id.0)
            .map_err(to_js_error)
    }

    /// `direction` is -1 for previous, 1 for next
    #[wasm_bindgen(js_name = moveFrame)]
    pub fn move_frame(&self, grid_id: u32, direction: i32) -> bool {
        let Some(direction) = MoveDirection::from_offset(direction) else {
            wasm_warn!("moveFrame: unsupported direction {}", direction);
            return false;
        };
        self.inner.borrow_mut().move_frame(GridId(grid_id), direction)
    }

    // ------------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------------

    #[wasm_bindgen(js_name = setFps)]
    pub fn set_fps(&self, fps: f64) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .set_fps(fps, browser::now_ms())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> f64 {
        self.inner.borrow().preview().fps()
    }

    /// Advance the preview; returns true when the shown frame changed
    pub fn tick(&self) -> bool {
        self.inner.borrow_mut().poll(browser::now_ms()) > 0
    }

    // ------------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------------

    #[wasm_bindgen(js_name = framesHtml)]
    pub fn frames_html(&self) -> Result<String, JsValue> {
        render::render_editor_frames(&self.inner.borrow()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = previewHtml)]
    pub fn preview_html(&self) -> Result<String, JsValue> {
        let view = self.inner.borrow().render_preview();
        render::render_grid_table(&view).map_err(to_js_error)
    }

    /// Frame views as plain objects, for hosts that build their own DOM
    #[wasm_bindgen(js_name = framesView)]
    pub fn frames_view(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.borrow().render_frames(), "Failed to serialize frames")
    }

    #[wasm_bindgen(js_name = previewView)]
    pub fn preview_view(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.borrow().render_preview(), "Failed to serialize preview")
    }

    pub fn navigation(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.borrow().navigation(), "Failed to serialize navigation")
    }

    // ------------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------------

    #[wasm_bindgen(js_name = exportDocument)]
    pub fn export_document(&self) -> Result<String, JsValue> {
        self.inner.borrow().export_document().map_err(to_js_error)
    }

    /// Load a document chosen by the user; a rejected document changes nothing
    #[wasm_bindgen(js_name = importDocument)]
    pub fn import_document(&self, text: &str) -> Result<(), JsValue> {
        wasm_info!("importDocument called ({} bytes)", text.len());
        self.inner
            .borrow_mut()
            .import_document(text, browser::now_ms())
            .map_err(to_js_error)
    }

    /// Download the animation as `animation_<timestamp>.json`
    #[wasm_bindgen(js_name = saveToDisk)]
    pub fn save_to_disk(&self) -> Result<(), JsValue> {
        let app = self.inner.borrow();
        let text = app.export_document().map_err(to_js_error)?;
        let name = app.local_file_name();
        browser::download_text(&name, &text, local::EXPORT_MIME).map_err(to_js_error)?;
        wasm_info!("Saved {} to disk", name);
        Ok(())
    }

    /// Back to blank frames at the default rate
    #[wasm_bindgen(js_name = clearAnimation)]
    pub fn clear_animation(&self) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .clear_animation(browser::now_ms())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = hasUnsavedChanges)]
    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.borrow().has_unsaved_changes()
    }

    /// Whether the page should confirm before replacing or leaving the animation
    #[wasm_bindgen(js_name = needsConfirmation)]
    pub fn needs_confirmation(&self) -> bool {
        self.inner.borrow().needs_confirmation()
    }

    // ------------------------------------------------------------------------
    // Storage service
    // ------------------------------------------------------------------------

    /// POST the animation to the server; resolves with the refreshed file list
    #[wasm_bindgen(js_name = saveToServer)]
    pub fn save_to_server(&self, name: Option<String>) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let (request, list_url) = {
                let app = inner.borrow();
                let request = app.save_request(name.as_deref()).map_err(to_js_error)?;
                (request, remote::list_url(app.config()))
            };
            browser::post_json(&request.url, &request.body)
                .await
                .map_err(to_js_error)?;
            wasm_info!("Saved {} to server", request.file_name);
            let files = fetch_file_list(&list_url).await;
            serialize(&files, "Failed to serialize file list")
        })
    }

    /// Resolves with the names of saved animations; empty on failure
    #[wasm_bindgen(js_name = listServerFiles)]
    pub fn list_server_files(&self) -> Promise {
        let list_url = remote::list_url(self.inner.borrow().config());
        future_to_promise(async move {
            let files = fetch_file_list(&list_url).await;
            serialize(&files, "Failed to serialize file list")
        })
    }

    /// Fetch and load a saved animation; resolves with whether it was loaded
    #[wasm_bindgen(js_name = loadFromServer)]
    pub fn load_from_server(&self, file_name: String) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let url = remote::document_url(inner.borrow().config(), &file_name).map_err(to_js_error)?;
            let loaded = match fetch_record(&url).await {
                Ok(record) => {
                    inner.borrow_mut().load_animation(&record, browser::now_ms());
                    true
                }
                Err(e) => {
                    wasm_error!("Could not load {}: {}", file_name, e);
                    false
                }
            };
            Ok(JsValue::from_bool(loaded))
        })
    }
}

pub(crate) async fn fetch_record(url: &str) -> crate::error::AnimResult<AnimationRecord> {
    let text = browser::fetch_text(url).await?;
    AnimationRecord::from_json(&text)
}

async fn fetch_file_list(url: &str) -> Vec<String> {
    let body = match browser::fetch_text(url).await {
        Ok(body) => body,
        Err(e) => {
            wasm_error!("Could not list saved animations: {}", e);
            return Vec::new();
        }
    };
    remote::parse_file_list(&body).unwrap_or_else(|e| {
        wasm_error!("Unexpected file list: {}", e);
        Vec::new()
    })
}
