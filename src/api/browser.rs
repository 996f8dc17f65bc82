//! Browser glue: clock, fetch, localStorage and file downloads
//!
//! Everything that touches `window` lives here so the editor core stays plain Rust.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Request, RequestInit, Response, Storage, Url, Window};

use super::helpers::describe_js;
use crate::error::{AnimError, AnimResult};
use crate::storage::{PendingStore, SaveRequest};

pub fn window() -> AnimResult<Window> {
    web_sys::window().ok_or_else(|| AnimError::network("no global window"))
}

/// Milliseconds on the page's monotonic clock
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

async fn send(request: &Request) -> AnimResult<Response> {
    let promise = window()?.fetch_with_request(request);
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| AnimError::network(describe_js(&e)))?;
    let response: Response = value
        .dyn_into()
        .map_err(|e| AnimError::network(describe_js(&e)))?;
    if !response.ok() {
        return Err(AnimError::network(format!(
            "{} {} for {}",
            response.status(),
            response.status_text(),
            response.url()
        )));
    }
    Ok(response)
}

async fn response_text(response: Response) -> AnimResult<String> {
    let promise = response.text().map_err(|e| AnimError::network(describe_js(&e)))?;
    let text = JsFuture::from(promise)
        .await
        .map_err(|e| AnimError::network(describe_js(&e)))?;
    text.as_string()
        .ok_or_else(|| AnimError::network("response body is not text"))
}

/// GET `url` and return the body
pub async fn fetch_text(url: &str) -> AnimResult<String> {
    let init = RequestInit::new();
    init.set_method("GET");
    let request = Request::new_with_str_and_init(url, &init)
        .map_err(|e| AnimError::network(describe_js(&e)))?;
    let response = send(&request).await?;
    response_text(response).await
}

/// POST a JSON body to `url`
pub async fn post_json(url: &str, body: &str) -> AnimResult<()> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(body));
    let request = Request::new_with_str_and_init(url, &init)
        .map_err(|e| AnimError::network(describe_js(&e)))?;
    request
        .headers()
        .set("Content-Type", SaveRequest::CONTENT_TYPE)
        .map_err(|e| AnimError::network(describe_js(&e)))?;
    send(&request).await?;
    Ok(())
}

/// `window.localStorage` as a `PendingStore`
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> AnimResult<Self> {
        let storage = window()?
            .local_storage()
            .map_err(|e| AnimError::storage(describe_js(&e)))?
            .ok_or_else(|| AnimError::storage("localStorage is not available"))?;
        Ok(Self { storage })
    }
}

impl PendingStore for LocalStorage {
    fn get_item(&self, key: &str) -> AnimResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| AnimError::storage(describe_js(&e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> AnimResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| AnimError::storage(describe_js(&e)))
    }

    fn remove_item(&mut self, key: &str) -> AnimResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| AnimError::storage(describe_js(&e)))
    }
}

/// Offer `text` to the user as a downloaded file
pub fn download_text(file_name: &str, text: &str, mime: &str) -> AnimResult<()> {
    let storage_err = |e: JsValue| AnimError::storage(describe_js(&e));

    let parts = Array::of1(&JsValue::from_str(text));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(storage_err)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(storage_err)?;

    let document = window()?
        .document()
        .ok_or_else(|| AnimError::storage("no document"))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(storage_err)?
        .dyn_into()
        .map_err(|_| AnimError::storage("anchor element has an unexpected type"))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(storage_err)
}
