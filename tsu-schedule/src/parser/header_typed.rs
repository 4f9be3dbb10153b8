use tracing::debug;

use crate::lesson::{parse_weekday, Grouping, Lesson, LessonType, Variant};
use crate::parser::{field_value, insert};
use crate::query::DocumentQuery;

/// Parses the table whose header labels name the lesson type of each column.
///
/// Every lesson cell wraps one element whose first three children read
/// `Lecturer: …`, `Room: …` and `Day: <weekday>,<start>-<end>`.
pub fn parse<D: DocumentQuery>(doc: &D, table: D::Node) -> Option<Grouping> {
  let header_row = match doc
    .child_by_tag(table, "thead")
    .and_then(|head| doc.child_by_tag(head, "tr"))
  {
    None => {
      debug!("Schedule table has no header row");
      return None;
    }
    Some(row) => row,
  };

  let kinds = doc
    .children(header_row)
    .into_iter()
    .filter_map(|cell| LessonType::from_header(&doc.inner_html(cell)))
    .collect::<Vec<LessonType>>();

  let body = match doc.child_by_tag(table, "tbody") {
    None => {
      debug!("Schedule table has no body");
      return None;
    }
    Some(body) => body,
  };

  let mut grouping = Grouping::new();

  for row in doc.children_by_tag(body, "tr") {
    let cells = doc.children(row);
    let name = match cells.first() {
      None => continue,
      Some(cell) => doc.inner_text(*cell),
    };

    // type i is read from cell i + 1, the first cell holds the course name
    for (index, kind) in kinds.iter().enumerate() {
      let cell = match cells.get(index + 1) {
        None => continue,
        Some(cell) => *cell,
      };

      if let Some((day, lesson)) = read_cell(doc, cell, *kind, &name) {
        match parse_weekday(&day) {
          None => debug!("Dropping {}, unknown weekday {:?}", name, day),
          Some(weekday) => insert(&mut grouping, Variant::HeaderTyped, weekday, lesson),
        }
      }
    }
  }

  Some(grouping)
}

fn read_cell<D: DocumentQuery>(
  doc: &D,
  cell: D::Node,
  kind: LessonType,
  name: &str,
) -> Option<(String, Lesson)> {
  if doc.inner_html(cell).trim().is_empty() {
    return None;
  }

  let container = *doc.children(cell).first()?;
  let fields = doc
    .children(container)
    .into_iter()
    .map(|field| doc.inner_text(field))
    .collect::<Vec<String>>();

  if fields.len() < 3 {
    debug!("Skipping {} cell of {}, {} fields", kind.label(), name, fields.len());
    return None;
  }

  let lecturer = field_value(&fields[0])?;
  let room = field_value(&fields[1])?;
  let (day, time) = field_value(&fields[2])?.split_once(',')?;
  let (start_time, end_time) = time.split_once('-')?;

  let lesson = Lesson::new(kind, name, lecturer, room, start_time, end_time, "");
  if lesson.is_none() {
    debug!("Skipping {} cell of {}, malformed fields", kind.label(), name);
  }

  Some((day.trim().to_string(), lesson?))
}
