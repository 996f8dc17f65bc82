//! HTML rendering with Mustache templates
//!
//! - `grid_table.html.mustache`: the table of cells for one grid
//! - `frame_container.html.mustache`: an editor frame with its move/copy/delete buttons
//! - `gallery_card.html.mustache`: a gallery entry with its load button
//!
//! Cell text goes through `{{text}}` and is HTML-escaped; the nested table is
//! inserted with `{{{table}}}` since it is already rendered markup.

use serde::Serialize;

use crate::editor::{AppController, Gallery, NavigationState};
use crate::error::{AnimError, AnimResult};
use crate::models::grid::{CELL_HEIGHT_EM, CELL_WIDTH_CH};
use crate::models::{GridId, GridView, ViewCell};

#[derive(Debug, Clone, Copy)]
pub enum HtmlTemplate {
    GridTable,
    FrameContainer,
    GalleryCard,
}

/// Get template content by type
pub fn get_template_content(template_type: HtmlTemplate) -> &'static str {
    match template_type {
        HtmlTemplate::GridTable => include_str!("templates/grid_table.html.mustache"),
        HtmlTemplate::FrameContainer => include_str!("templates/frame_container.html.mustache"),
        HtmlTemplate::GalleryCard => include_str!("templates/gallery_card.html.mustache"),
    }
}

fn render<T: Serialize>(template_type: HtmlTemplate, context: &T) -> AnimResult<String> {
    let template = mustache::compile_str(get_template_content(template_type))
        .map_err(|e| AnimError::Template(format!("{:?}: {}", template_type, e)))?;
    template
        .render_to_string(context)
        .map_err(|e| AnimError::Template(format!("{:?}: {}", template_type, e)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TableContext<'a> {
    id: GridId,
    css_width: &'a str,
    css_height: &'a str,
    transform: &'a str,
    cell_width: f64,
    cell_height: f64,
    rows: Vec<RowContext<'a>>,
}

#[derive(Serialize)]
struct RowContext<'a> {
    cells: &'a [ViewCell],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerContext {
    id: GridId,
    element_id: String,
    table: String,
    can_move_previous: bool,
    can_move_next: bool,
}

#[derive(Serialize)]
struct CardContext<'a> {
    index: usize,
    name: &'a str,
    table: String,
}

pub fn render_grid_table(view: &GridView) -> AnimResult<String> {
    let context = TableContext {
        id: view.id,
        css_width: &view.css_width,
        css_height: &view.css_height,
        transform: &view.transform,
        cell_width: CELL_WIDTH_CH,
        cell_height: CELL_HEIGHT_EM,
        rows: view.rows.iter().map(|cells| RowContext { cells }).collect(),
    };
    render(HtmlTemplate::GridTable, &context)
}

pub fn render_frame_container(view: &GridView, nav: &NavigationState, element_id: &str) -> AnimResult<String> {
    let context = ContainerContext {
        id: view.id,
        element_id: element_id.to_string(),
        table: render_grid_table(view)?,
        can_move_previous: nav.can_move_previous,
        can_move_next: nav.can_move_next,
    };
    render(HtmlTemplate::FrameContainer, &context)
}

/// Every editor frame, in order
pub fn render_editor_frames(app: &AppController) -> AnimResult<String> {
    let views = app.render_frames();
    let nav = app.navigation();
    let mut html = String::new();
    for ((view, nav), grid) in views.iter().zip(&nav).zip(app.frames().grids()) {
        html.push_str(&render_frame_container(view, nav, &grid.element_id())?);
    }
    Ok(html)
}

pub fn render_gallery(gallery: &Gallery) -> AnimResult<String> {
    let mut html = String::new();
    for (index, (entry, view)) in gallery.entries().iter().zip(gallery.render()).enumerate() {
        let context = CardContext {
            index,
            name: entry.name(),
            table: render_grid_table(&view)?,
        };
        html.push_str(&render(HtmlTemplate::GalleryCard, &context)?);
    }
    Ok(html)
}
