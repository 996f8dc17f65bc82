//! Character grid model
//!
//! A `Grid` is a fixed-size, row-major buffer of single-character cells. The
//! buffer is the only source of truth; the page's table is a projection built
//! from `render()` and is never read back.
//!
//! `FrameRecord` is the serialized, immutable snapshot of a grid
//! (`{width, height, cells}`). Records are validated on construction, so a
//! `FrameRecord` value always satisfies `cells.len() == width * height`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AnimError, AnimResult};
use crate::events::{ChangeBus, GridChanged};

/// Content of an empty cell
pub const BLANK: &str = " ";

/// Cell box size, in `ch` horizontally and `em` vertically
pub const CELL_WIDTH_CH: f64 = 1.75;
pub const CELL_HEIGHT_EM: f64 = 1.25;

/// Identity of a grid instance within one page
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridId(pub u32);

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Frame record
// ============================================================================

/// Serialized grid snapshot: `{width, height, cells}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "serde_json::Value")]
pub struct FrameRecord {
    width: usize,
    height: usize,
    cells: Vec<String>,
}

impl FrameRecord {
    /// Build a record, checking the cell count against the dimensions
    pub fn new(width: usize, height: usize, cells: Vec<String>) -> AnimResult<Self> {
        if width == 0 || height == 0 {
            return Err(AnimError::invalid_frame(format!(
                "width and height must be positive, got {}x{}",
                width, height
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            AnimError::invalid_frame(format!("dimensions {}x{} overflow", width, height))
        })?;
        if cells.len() != expected {
            return Err(AnimError::invalid_frame(format!(
                "expected {} cells for {}x{}, got {}",
                expected,
                width,
                height,
                cells.len()
            )));
        }
        Ok(Self { width, height, cells })
    }

    /// An all-blank record of the given size (sizes are clamped to 1)
    pub fn blank(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![BLANK.to_string(); width * height],
        }
    }

    /// Check an untyped JSON value against the validity rule
    ///
    /// Object type; `width` and `height` positive whole numbers; `cells` an array
    /// of exactly `width * height` entries. Entries are not inspected beyond
    /// that: strings are kept, `null` becomes an empty cell, anything else is
    /// kept as its JSON text.
    pub fn from_value(value: &Value) -> AnimResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| AnimError::invalid_frame("expected an object"))?;
        let width = positive_dimension(obj.get("width"), "width")?;
        let height = positive_dimension(obj.get("height"), "height")?;
        let cells = obj
            .get("cells")
            .and_then(Value::as_array)
            .ok_or_else(|| AnimError::invalid_frame("'cells' should be an array"))?;

        let cells = cells
            .iter()
            .map(|cell| match cell {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        Self::new(width, height, cells)
    }

    /// Quick boolean form of the validity rule
    pub fn is_valid_value(value: &Value) -> bool {
        Self::from_value(value).is_ok()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&str> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x).map(String::as_str)
        } else {
            None
        }
    }

    pub fn same_size(&self, other: &FrameRecord) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl TryFrom<Value> for FrameRecord {
    type Error = AnimError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

fn positive_dimension(value: Option<&Value>, name: &str) -> AnimResult<usize> {
    let n = value
        .and_then(Value::as_f64)
        .ok_or_else(|| AnimError::invalid_frame(format!("'{}' should be a number", name)))?;
    if n <= 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
        return Err(AnimError::invalid_frame(format!(
            "'{}' should be a positive whole number, got {}",
            name, n
        )));
    }
    Ok(n as usize)
}

// ============================================================================
// Grid
// ============================================================================

/// Fixed-size rectangular buffer of character cells
#[derive(Clone, Debug)]
pub struct Grid {
    id: GridId,
    width: usize,
    height: usize,
    /// Display multiplier, cosmetic only
    scale: f64,
    cells: Vec<String>,
    bus: Option<ChangeBus>,
}

impl Grid {
    /// Create an all-blank grid (sizes are clamped to 1)
    pub fn new(width: usize, height: usize, scale: f64) -> Self {
        Self::with_id(GridId(0), width, height, scale)
    }

    pub fn with_id(id: GridId, width: usize, height: usize, scale: f64) -> Self {
        let blank = FrameRecord::blank(width, height);
        Self {
            id,
            width: blank.width,
            height: blank.height,
            scale,
            cells: blank.cells,
            bus: None,
        }
    }

    /// Publish change notifications on `bus` from now on
    pub fn attach(&mut self, bus: ChangeBus) {
        self.bus = Some(bus);
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        self.contains(x, y).then(|| y * self.width + x)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&str> {
        self.index(x, y).map(|i| self.cells[i].as_str())
    }

    /// Write `text` into cell `(x, y)`
    ///
    /// Returns false (and changes nothing) when the coordinates are outside the grid.
    pub fn set_cell(&mut self, x: usize, y: usize, text: &str) -> bool {
        let Some(index) = self.index(x, y) else {
            return false;
        };
        self.cells[index] = text.to_string();
        self.notify();
        true
    }

    pub fn serialize(&self) -> FrameRecord {
        FrameRecord {
            width: self.width,
            height: self.height,
            cells: self.cells.clone(),
        }
    }

    /// Replace size and content with a snapshot
    pub fn deserialize(&mut self, record: &FrameRecord) {
        self.width = record.width;
        self.height = record.height;
        self.cells = record.cells.clone();
        self.notify();
    }

    /// Validate an untyped record, then apply it; nothing changes on error
    pub fn deserialize_value(&mut self, value: &Value) -> AnimResult<()> {
        let record = FrameRecord::from_value(value)?;
        self.deserialize(&record);
        Ok(())
    }

    /// Blank every cell, keeping the current size
    pub fn clear(&mut self) {
        self.cells = vec![BLANK.to_string(); self.width * self.height];
        self.notify();
    }

    /// Every cell concatenated in row-major order
    pub fn to_text(&self) -> String {
        self.cells.concat()
    }

    /// One string per row
    pub fn to_lines(&self) -> Vec<String> {
        self.cells.chunks(self.width).map(|row| row.concat()).collect()
    }

    /// Project the buffer into a renderable view
    pub fn render(&self) -> GridView {
        self.render_with_selection(None)
    }

    pub fn render_with_selection(&self, selected: Option<(usize, usize)>) -> GridView {
        let rows = self
            .cells
            .chunks(self.width)
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, text)| ViewCell {
                        x,
                        y,
                        text: text.clone(),
                        selected: selected == Some((x, y)),
                    })
                    .collect()
            })
            .collect();

        GridView {
            id: self.id,
            width: self.width,
            height: self.height,
            css_width: format!("{}ch", self.width as f64 * CELL_WIDTH_CH),
            css_height: format!("{}em", self.height as f64 * CELL_HEIGHT_EM),
            transform: format!("scale({})", self.scale),
            rows,
        }
    }

    fn notify(&self) {
        if let Some(bus) = &self.bus {
            bus.publish(GridChanged { grid: self.id });
        }
    }
}

// ============================================================================
// View projection
// ============================================================================

/// One cell as the page should draw it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewCell {
    pub x: usize,
    pub y: usize,
    pub text: String,
    pub selected: bool,
}

/// Everything the page needs to (re)build a grid's table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub id: GridId,
    pub width: usize,
    pub height: usize,
    pub css_width: String,
    pub css_height: String,
    pub transform: String,
    pub rows: Vec<Vec<ViewCell>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangeQueue;
    use serde_json::json;

    #[test]
    fn test_new_grid_is_blank() {
        let grid = Grid::new(4, 3, 1.0);
        assert_eq!(grid.cells().len(), 12);
        assert!(grid.cells().iter().all(|c| c == BLANK));
    }

    #[test]
    fn test_set_cell_bounds() {
        let mut grid = Grid::new(3, 2, 1.0);
        assert!(grid.set_cell(2, 1, "x"));
        assert_eq!(grid.cell(2, 1), Some("x"));
        assert_eq!(grid.cells()[5], "x");

        assert!(!grid.set_cell(3, 0, "y"));
        assert!(!grid.set_cell(0, 2, "y"));
        assert!(!grid.cells().iter().any(|c| c == "y"));
    }

    #[test]
    fn test_set_cell_notifies_only_on_write() {
        let bus = ChangeBus::new();
        let queue = ChangeQueue::attach(&bus);
        let mut grid = Grid::with_id(GridId(3), 2, 2, 1.0);
        grid.attach(bus);

        grid.set_cell(1, 1, "a");
        grid.set_cell(9, 9, "b");

        assert_eq!(queue.drain(), vec![GridId(3)]);
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut grid = Grid::new(2, 2, 1.0);
        grid.set_cell(0, 0, "A");
        grid.set_cell(1, 1, "Z");
        let record = grid.serialize();

        let mut other = Grid::new(5, 5, 1.0);
        other.deserialize(&record);

        assert_eq!(other.serialize(), record);
        assert_eq!(other.width(), 2);
    }

    #[test]
    fn test_validity_rule() {
        assert!(FrameRecord::is_valid_value(&json!({"width": 2, "height": 1, "cells": ["a", "b"]})));
        assert!(!FrameRecord::is_valid_value(&json!({"width": 2, "height": 1, "cells": ["a"]})));
        assert!(!FrameRecord::is_valid_value(&json!({"width": 0, "height": 1, "cells": []})));
        assert!(!FrameRecord::is_valid_value(&json!({"width": "2", "height": 1, "cells": ["a", "b"]})));
        assert!(!FrameRecord::is_valid_value(&json!({"width": 1, "height": 1, "cells": "a"})));
        assert!(!FrameRecord::is_valid_value(&json!({})));
        assert!(!FrameRecord::is_valid_value(&json!(null)));
        assert!(!FrameRecord::is_valid_value(&json!([1, 2])));
    }

    #[test]
    fn test_from_value_normalizes_entries() {
        let record =
            FrameRecord::from_value(&json!({"width": 3, "height": 1, "cells": ["a", null, 7]})).unwrap();
        assert_eq!(record.cells(), &["a".to_string(), String::new(), "7".to_string()]);
    }

    #[test]
    fn test_serde_goes_through_validation() {
        let ok: Result<FrameRecord, _> =
            serde_json::from_str(r##"{"width":1,"height":2,"cells":[" ","#"]}"##);
        assert_eq!(ok.unwrap().cell(0, 1), Some("#"));

        let bad: Result<FrameRecord, _> = serde_json::from_str(r#"{"width":2,"height":2,"cells":[]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_deserialize_value_leaves_grid_on_error() {
        let mut grid = Grid::new(2, 1, 1.0);
        grid.set_cell(0, 0, "q");
        let err = grid.deserialize_value(&json!({"width": 2, "height": 2, "cells": []}));
        assert!(matches!(err, Err(AnimError::InvalidFrame(_))));
        assert_eq!(grid.to_text(), "q ");
    }

    #[test]
    fn test_text_dump() {
        let mut grid = Grid::new(2, 2, 1.0);
        grid.set_cell(0, 0, "a");
        grid.set_cell(1, 1, "d");
        assert_eq!(grid.to_text(), "a  d");
        assert_eq!(grid.to_lines(), vec!["a ".to_string(), " d".to_string()]);
    }

    #[test]
    fn test_render_projection() {
        let mut grid = Grid::with_id(GridId(1), 12, 8, 2.0);
        grid.set_cell(3, 2, "@");
        let view = grid.render_with_selection(Some((3, 2)));

        assert_eq!(view.css_width, "21ch");
        assert_eq!(view.css_height, "10em");
        assert_eq!(view.transform, "scale(2)");
        assert_eq!(view.rows.len(), 8);
        assert_eq!(view.rows[2][3].text, "@");
        assert!(view.rows[2][3].selected);
        assert_eq!(view.rows.iter().flatten().filter(|c| c.selected).count(), 1);
    }
}
