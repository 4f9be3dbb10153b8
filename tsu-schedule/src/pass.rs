use tracing::{debug, info};

use crate::grid::{render_grid, Grid, GRID_ID};
use crate::legend::render_legend;
use crate::lesson::Variant;
use crate::parser;
use crate::query::DocumentMut;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassSummary {
  pub columns: usize,
  pub rows: usize,
  pub lessons: usize,
}

/// Replaces the first table of the document with the weekly grid and a legend.
///
/// Returns `Ok(None)` and leaves the document untouched if there is no table to work on or
/// the table is not shaped like a schedule.
/// The portal's table is only hidden, after the grid is in place.
pub fn render_pass<D: DocumentMut>(
  doc: &mut D,
  variant: Variant,
) -> anyhow::Result<Option<PassSummary>> {
  let legacy = match doc.first_by_tag("table") {
    None => {
      debug!("No schedule table in document");
      return Ok(None);
    }
    Some(table) => table,
  };

  if doc.attr(legacy, "id") == Some(GRID_ID) {
    debug!("Only the rendered grid is left, nothing to parse");
    return Ok(None);
  }

  let parent = match doc.parent(legacy) {
    None => return Ok(None),
    Some(parent) => parent,
  };

  let grouping = match parser::parse(doc, legacy, variant) {
    None => return Ok(None),
    Some(grouping) => grouping,
  };
  let grid = Grid::build(&grouping, variant);

  let table = render_grid(doc, &grid, variant)?;
  doc.append_child(parent, table);
  doc.set_style(legacy, "display", "none");

  let legend = render_legend(doc);
  doc.append_child(parent, legend);

  let summary = PassSummary {
    columns: grid.columns.len(),
    rows: grid.rows.len(),
    lessons: grid.lessons(),
  };

  info!(
    "Rendered {} lessons in {} columns and {} rows",
    summary.lessons, summary.columns, summary.rows
  );

  Ok(Some(summary))
}
