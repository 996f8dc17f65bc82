//! A standalone preview player for pages that only show an animation

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use super::browser;
use super::editor::fetch_record;
use super::helpers::{serialize, to_js_error};
use crate::config::DEFAULT_FPS;
use crate::editor::FramePlayer;
use crate::render;
use crate::wasm_warn;

#[wasm_bindgen]
pub struct AnimationPlayer {
    inner: Rc<RefCell<FramePlayer>>,
}

#[wasm_bindgen]
impl AnimationPlayer {
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize, scale: f64) -> AnimationPlayer {
        AnimationPlayer {
            inner: Rc::new(RefCell::new(FramePlayer::new(width, height, scale, Vec::new(), DEFAULT_FPS))),
        }
    }

    pub fn play(&self) {
        self.inner.borrow_mut().play(browser::now_ms());
    }

    pub fn stop(&self) {
        self.inner.borrow_mut().stop();
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().is_playing()
    }

    #[wasm_bindgen(js_name = setFps)]
    pub fn set_fps(&self, fps: f64) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .set_fps(fps, browser::now_ms())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setFrame)]
    pub fn set_frame(&self, index: usize) -> bool {
        self.inner.borrow_mut().set_frame(index)
    }

    #[wasm_bindgen(js_name = currentFrameIndex)]
    pub fn current_frame_index(&self) -> usize {
        self.inner.borrow().current_frame_index()
    }

    /// Returns true when the shown frame changed
    pub fn tick(&self) -> bool {
        self.inner.borrow_mut().poll(browser::now_ms()) > 0
    }

    /// Load a document from text and start playing it
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&self, text: &str) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .load_from_document(text, browser::now_ms())
            .map_err(to_js_error)
    }

    /// Fetch a document and play it; on failure the current animation keeps playing
    #[wasm_bindgen(js_name = loadFromUrl)]
    pub fn load_from_url(&self, url: String) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let fetched = fetch_record(&url).await;
            let loaded = inner
                .borrow_mut()
                .apply_fetched(fetched, &url, browser::now_ms());
            if !loaded {
                wasm_warn!("loadFromUrl: keeping the current animation");
            }
            Ok(JsValue::from_bool(loaded))
        })
    }

    #[wasm_bindgen(js_name = exportDocument)]
    pub fn export_document(&self) -> Result<String, JsValue> {
        self.inner.borrow().to_json().map_err(to_js_error)
    }

    pub fn html(&self) -> Result<String, JsValue> {
        let view = self.inner.borrow().render();
        render::render_grid_table(&view).map_err(to_js_error)
    }

    pub fn view(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.borrow().render(), "Failed to serialize player view")
    }
}
