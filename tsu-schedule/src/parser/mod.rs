use time::Weekday;
use tracing::debug;

use crate::lesson::{push_lesson, Grouping, Lesson, Variant};
use crate::query::DocumentQuery;

pub mod header_typed;
pub mod syllabus_linked;

/// Reads the portal's schedule table into lessons grouped by day.
///
/// Returns `None` if the table lacks the header or body the variant needs. Cells that do
/// not look like a lesson are skipped.
pub fn parse<D: DocumentQuery>(doc: &D, table: D::Node, variant: Variant) -> Option<Grouping> {
  match variant {
    Variant::HeaderTyped => header_typed::parse(doc, table),
    Variant::SyllabusLinked => syllabus_linked::parse(doc, table),
  }
}

fn insert(grouping: &mut Grouping, variant: Variant, weekday: Weekday, lesson: Lesson) {
  if !variant.weekdays().contains(&weekday) {
    debug!("Dropping {} on {}, no classes that day", lesson.name, weekday);
    return;
  }

  push_lesson(grouping, weekday, lesson);
}

/// Value part of a `"Label: value"` field, or the whole field if it carries no label.
fn field_value(field: &str) -> Option<&str> {
  let value = match field.split_once(": ") {
    None => field,
    Some((_, value)) => value,
  };

  Some(value.trim()).filter(|value| !value.is_empty())
}
