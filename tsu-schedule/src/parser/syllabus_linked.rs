use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::dom::normalize_ws;
use crate::lesson::{parse_weekday, Grouping, Lesson, LessonType, Variant};
use crate::parser::{field_value, insert};
use crate::query::DocumentQuery;

static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)<br\\s*/?>").unwrap());
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new("<[^>]*>").unwrap());

const SEGMENTS: usize = 5;

/// Parses the table with one fixed column per lesson type.
///
/// Row layout: course name, one cell per [`LessonType::ALL`] entry, and a trailing cell whose
/// `id` reads `<prefix>_<syllabus id>`. A lesson cell holds five `<br>` separated fields:
/// lecturer, weekday, start time, end time and room.
pub fn parse<D: DocumentQuery>(doc: &D, table: D::Node) -> Option<Grouping> {
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
    if cells.len() < LessonType::ALL.len() + 2 {
      debug!("Skipping row with {} cells", cells.len());
      continue;
    }

    let name = doc.inner_text(cells[0]);
    let syllabus_id = cells
      .last()
      .and_then(|cell| doc.attr(*cell, "id"))
      .and_then(|id| id.split_once('_'))
      .map(|(_, id)| id.to_string())
      .unwrap_or_default();

    for (index, kind) in LessonType::ALL.iter().enumerate() {
      let html = doc.inner_html(cells[index + 1]);
      if html.trim().is_empty() {
        continue;
      }

      let values = match read_segments(&html) {
        None => {
          debug!("Skipping {} cell of {}, malformed fields", kind.label(), name);
          continue;
        }
        Some(values) => values,
      };

      let weekday = match parse_weekday(&values[1]) {
        None => {
          debug!("Dropping {}, unknown weekday {:?}", name, values[1]);
          continue;
        }
        Some(weekday) => weekday,
      };

      match Lesson::new(
        *kind,
        &name,
        &values[0],
        &values[4],
        &values[2],
        &values[3],
        &syllabus_id,
      ) {
        None => debug!("Skipping {} cell of {}, malformed fields", kind.label(), name),
        Some(lesson) => insert(&mut grouping, Variant::SyllabusLinked, weekday, lesson),
      }
    }
  }

  Some(grouping)
}

fn read_segments(html: &str) -> Option<Vec<String>> {
  let segments = LINE_BREAK_REGEX
    .split(html)
    .map(clean_segment)
    .filter(|segment| !segment.is_empty())
    .collect::<Vec<String>>();

  if segments.len() != SEGMENTS {
    return None;
  }

  segments
    .iter()
    .map(|segment| field_value(segment).map(str::to_string))
    .collect()
}

fn clean_segment(segment: &str) -> String {
  let text = TAG_REGEX.replace_all(segment, "");
  normalize_ws(&decode_entities(&text))
}

/// Reverses the escaping of serialized text. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
fn decode_entities(value: &str) -> String {
  value
    .replace("&nbsp;", " ")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&amp;", "&")
}
