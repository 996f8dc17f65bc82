//! The gallery page

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use super::browser::{self, LocalStorage};
use super::helpers::{deserialize_or_default, to_js_error};
use crate::config::EditorConfig;
use crate::editor::Gallery;
use crate::render;
use crate::{wasm_error, wasm_info, wasm_warn};

#[wasm_bindgen]
pub struct GalleryView {
    inner: Rc<RefCell<Gallery>>,
}

#[wasm_bindgen]
impl GalleryView {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<GalleryView, JsValue> {
        let config: EditorConfig = deserialize_or_default(config, "Invalid gallery config")?;
        let gallery = Gallery::new(config).map_err(to_js_error)?;
        Ok(GalleryView {
            inner: Rc::new(RefCell::new(gallery)),
        })
    }

    /// Fetch the catalog and every animation it lists
    ///
    /// Entries that fail to load are skipped. Resolves with the number of
    /// entries added.
    pub fn load(&self) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let catalog_url = inner.borrow().catalog_url();
            let catalog = browser::fetch_text(&catalog_url).await.map_err(to_js_error)?;
            let names = Gallery::parse_catalog(&catalog).map_err(to_js_error)?;

            let mut added = 0u32;
            for name in names {
                let url = match inner.borrow().entry_url(&name) {
                    Ok(url) => url,
                    Err(e) => {
                        wasm_warn!("Skipping gallery entry: {}", e);
                        continue;
                    }
                };
                let text = match browser::fetch_text(&url).await {
                    Ok(text) => text,
                    Err(e) => {
                        wasm_error!("Could not load {}: {}", name, e);
                        continue;
                    }
                };
                match inner.borrow_mut().add_document(&name, &text, browser::now_ms()) {
                    Ok(_) => added += 1,
                    Err(e) => wasm_error!("Invalid gallery animation {}: {}", name, e),
                }
            }
            wasm_info!("Gallery loaded {} animations", added);
            Ok(JsValue::from(added))
        })
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns true when any card changed frame
    pub fn tick(&self) -> bool {
        self.inner.borrow_mut().poll(browser::now_ms()) > 0
    }

    pub fn html(&self) -> Result<String, JsValue> {
        render::render_gallery(&self.inner.borrow()).map_err(to_js_error)
    }

    /// Hand an entry to the editor page; the caller navigates afterwards
    pub fn select(&self, index: usize) -> Result<(), JsValue> {
        let mut store = LocalStorage::open().map_err(to_js_error)?;
        self.inner
            .borrow()
            .select(index, &mut store)
            .map_err(to_js_error)
    }
}
