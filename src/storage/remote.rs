//! Storage service client
//!
//! The service is a flat directory of JSON files behind two endpoints:
//!
//! - `POST /save?filename=<name>` with an animation document as the body
//! - `GET /listfiles` returning a JSON array of file names
//!
//! This module builds the requests and reads the responses; the page performs
//! the actual `fetch` (see `api::browser`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EditorConfig;
use crate::error::{AnimError, AnimResult};
use crate::models::AnimationRecord;

pub const DEFAULT_SAVE_NAME: &str = "animation";
pub const SAVE_ENDPOINT: &str = "save";
pub const LIST_ENDPOINT: &str = "listfiles";

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("file name pattern is valid"));

/// Strip everything outside `[A-Za-z0-9_.-]`, the same rule the service applies
pub fn sanitize_file_name(name: &str) -> String {
    UNSAFE_FILE_CHARS.replace_all(name, "").into_owned()
}

/// File name for a save: user input (or the default), sanitized, with `.json`
pub fn save_file_name(input: Option<&str>) -> String {
    let cleaned = sanitize_file_name(input.map(str::trim).unwrap_or_default());
    let base = if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_SAVE_NAME.to_string()
    } else {
        cleaned
    };
    if base.ends_with(".json") {
        base
    } else {
        format!("{}.json", base)
    }
}

/// A ready-to-send save request
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub url: String,
    pub file_name: String,
    pub body: String,
}

impl SaveRequest {
    pub const CONTENT_TYPE: &'static str = "application/json";
}

pub fn save_request(config: &EditorConfig, name: Option<&str>, record: &AnimationRecord) -> SaveRequest {
    let file_name = save_file_name(name);
    SaveRequest {
        url: format!("{}?filename={}", config.server_endpoint(SAVE_ENDPOINT), file_name),
        file_name,
        body: record.to_json(),
    }
}

pub fn list_url(config: &EditorConfig) -> String {
    config.server_endpoint(LIST_ENDPOINT)
}

/// Read the `/listfiles` response; non-string entries are skipped
pub fn parse_file_list(body: &str) -> AnimResult<Vec<String>> {
    let value: Value = serde_json::from_str(body)?;
    let items = value
        .as_array()
        .ok_or_else(|| AnimError::network("file list is not an array"))?;
    Ok(items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect())
}

/// Where a listed (or catalog) document is served from
pub fn document_url(config: &EditorConfig, file: &str) -> AnimResult<String> {
    let file = file.trim();
    if file.is_empty() {
        return Err(AnimError::network("invalid file name provided"));
    }
    Ok(config.json_path(file))
}
