use sailfish::TemplateOnce;
use time::Weekday;

use crate::lesson::{weekday_label, Grouping, Lesson, Variant};
use crate::query::DocumentMut;

pub const GRID_ID: &str = "better-schedule";
const GRID_CLASS: &str =
  "table table-sm table-bordered table-responsive table-responsive-sm table-sticky";

/// Weekly layout: one column per day, lessons stacked by start time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
  pub columns: Vec<Weekday>,
  /// `rows[row][column]`, every row as wide as `columns`.
  pub rows: Vec<Vec<Option<Lesson>>>,
}

impl Grid {
  pub fn build(grouping: &Grouping, variant: Variant) -> Self {
    let columns = variant
      .weekdays()
      .iter()
      .copied()
      .filter(|weekday| !variant.prunes_columns() || grouping.contains_key(weekday))
      .collect::<Vec<Weekday>>();

    let height = grouping.values().map(Vec::len).max().unwrap_or(0);
    let mut rows = vec![vec![None; columns.len()]; height];

    for (column, weekday) in columns.iter().enumerate() {
      let mut lessons = match grouping.get(weekday) {
        None => continue,
        Some(lessons) => lessons.clone(),
      };

      // times are zero-padded, string order is chronological
      lessons.sort_by(|a, b| a.start_time.cmp(&b.start_time));

      for (row, lesson) in lessons.into_iter().enumerate() {
        rows[row][column] = Some(lesson);
      }
    }

    Self { columns, rows }
  }

  pub fn cell(&self, row: usize, column: usize) -> Option<&Lesson> {
    self.rows.get(row)?.get(column)?.as_ref()
  }

  pub fn lessons(&self) -> usize {
    self.rows.iter().flatten().flatten().count()
  }
}

#[derive(TemplateOnce)]
#[template(path = "lesson.stpl")]
struct LessonContent<'a> {
  lesson: &'a Lesson,
  syllabus_id: Option<&'a str>,
}

/// Renders the cell body of one lesson.
pub fn lesson_content(lesson: &Lesson, variant: Variant) -> anyhow::Result<String> {
  let syllabus_id = match variant {
    Variant::SyllabusLinked if !lesson.syllabus_id.is_empty() => Some(lesson.syllabus_id.as_str()),
    _ => None,
  };

  Ok(
    LessonContent {
      lesson,
      syllabus_id,
    }
    .render_once()?,
  )
}

/// Builds a detached `table#better-schedule`, dropping an earlier one from the document.
pub fn render_grid<D: DocumentMut>(
  doc: &mut D,
  grid: &Grid,
  variant: Variant,
) -> anyhow::Result<D::Node> {
  if let Some(previous) = doc.by_id(GRID_ID) {
    doc.remove(previous);
  }

  let table = doc.create_element("table");
  doc.set_attr(table, "id", GRID_ID);
  doc.set_attr(table, "class", GRID_CLASS);

  let head = doc.create_element("thead");
  let head_row = doc.create_element("tr");
  for weekday in &grid.columns {
    let header = doc.create_text_element("th", weekday_label(*weekday));
    doc.append_child(head_row, header);
  }
  doc.append_child(head, head_row);

  let body = doc.create_element("tbody");
  for row in &grid.rows {
    let tr = doc.create_element("tr");
    for cell in row {
      let td = doc.create_element("td");
      if let Some(lesson) = cell {
        let color = lesson.kind.color();
        doc.set_attr(td, "data-color", color);
        doc.set_style(td, "background-color", color);
        doc.set_inner_html(td, &lesson_content(lesson, variant)?);
      }
      doc.append_child(tr, td);
    }
    doc.append_child(body, tr);
  }

  doc.append_child(table, head);
  doc.append_child(table, body);

  Ok(table)
}
