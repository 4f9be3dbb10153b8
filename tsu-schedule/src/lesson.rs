use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use time::Time;
use time::Weekday::{self, Friday, Monday, Saturday, Sunday, Thursday, Tuesday, Wednesday};

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new("^(\\d{1,2}):(\\d{2})$").unwrap());

/// Lessons of one week, keyed by day. Within a day the order is parse order.
pub type Grouping = HashMap<Weekday, Vec<Lesson>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LessonType {
  #[serde(rename = "ლექცია")]
  Lecture,
  #[serde(rename = "ჯგუფური")]
  Group,
  #[serde(rename = "პრაქტიკული")]
  Practicum,
  #[serde(rename = "ლაბორატორია")]
  Laboratory,
}

impl LessonType {
  pub const ALL: [LessonType; 4] = [
    LessonType::Lecture,
    LessonType::Group,
    LessonType::Practicum,
    LessonType::Laboratory,
  ];

  pub fn label(self) -> &'static str {
    match self {
      LessonType::Lecture => "ლექცია",
      LessonType::Group => "ჯგუფური",
      LessonType::Practicum => "პრაქტიკული",
      LessonType::Laboratory => "ლაბორატორია",
    }
  }

  pub fn color(self) -> &'static str {
    match self {
      LessonType::Lecture => "LightSkyBlue",
      LessonType::Group => "LightGreen",
      LessonType::Practicum => "Plum",
      LessonType::Laboratory => "LemonChiffon",
    }
  }

  /// Maps a column label of the portal's schedule header.
  pub fn from_header(label: &str) -> Option<Self> {
    match label.trim() {
      "ლექცია" => Some(LessonType::Lecture),
      "სამუშაო ჯგუფი" => Some(LessonType::Group),
      "პრაქტიკული" => Some(LessonType::Practicum),
      "ლაბორატორიული" => Some(LessonType::Laboratory),
      _ => None,
    }
  }
}

/// Which markup the portal served.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
  /// Lesson types come from header labels, fields sit in nested elements.
  HeaderTyped,
  /// Lesson types are fixed per column, fields are `<br>` separated and rows link a syllabus.
  SyllabusLinked,
}

impl Variant {
  /// Days a lesson may fall on, Monday first.
  pub fn weekdays(self) -> &'static [Weekday] {
    match self {
      Variant::HeaderTyped => &[Monday, Tuesday, Wednesday, Thursday, Friday, Saturday],
      Variant::SyllabusLinked => &[Monday, Tuesday, Wednesday, Thursday, Friday],
    }
  }

  /// Whether days without lessons are left out of the grid.
  pub fn prunes_columns(self) -> bool {
    matches!(self, Variant::HeaderTyped)
  }
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
  match weekday {
    Monday => "ორშაბათი",
    Tuesday => "სამშაბათი",
    Wednesday => "ოთხშაბათი",
    Thursday => "ხუთშაბათი",
    Friday => "პარასკევი",
    Saturday => "შაბათი",
    Sunday => "კვირა",
  }
}

pub fn parse_weekday(label: &str) -> Option<Weekday> {
  match label.trim() {
    "ორშაბათი" => Some(Monday),
    "სამშაბათი" => Some(Tuesday),
    "ოთხშაბათი" => Some(Wednesday),
    "ხუთშაბათი" => Some(Thursday),
    "პარასკევი" => Some(Friday),
    "შაბათი" => Some(Saturday),
    "კვირა" => Some(Sunday),
    _ => None,
  }
}

/// Zero-pads `H:MM` to `HH:MM` so that string order is chronological.
pub fn normalize_time(raw: &str) -> Option<String> {
  let captures = TIME_REGEX.captures(raw.trim())?;
  let hour = u8::from_str(captures.get(1)?.as_str()).ok()?;
  let minute = u8::from_str(captures.get(2)?.as_str()).ok()?;
  let time = Time::from_hms(hour, minute, 0).ok()?;

  Some(format!("{:02}:{:02}", time.hour(), time.minute()))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
  #[serde(rename = "type")]
  pub kind: LessonType,
  pub lecturer: String,
  pub name: String,
  pub start_time: String,
  pub end_time: String,
  pub room: String,
  pub syllabus_id: String,
}

impl Lesson {
  /// Returns `None` if a required field is blank or a time is not `H:MM`.
  pub fn new(
    kind: LessonType,
    name: &str,
    lecturer: &str,
    room: &str,
    start_time: &str,
    end_time: &str,
    syllabus_id: &str,
  ) -> Option<Self> {
    let required = [name, lecturer, room];
    if required.iter().any(|value| value.trim().is_empty()) {
      return None;
    }

    Some(Self {
      kind,
      lecturer: lecturer.trim().to_string(),
      name: name.trim().to_string(),
      start_time: normalize_time(start_time)?,
      end_time: normalize_time(end_time)?,
      room: room.trim().to_string(),
      syllabus_id: syllabus_id.trim().to_string(),
    })
  }
}

/// Appends under `weekday`, creating the day on first use.
pub(crate) fn push_lesson(grouping: &mut Grouping, weekday: Weekday, lesson: Lesson) {
  match grouping.entry(weekday) {
    Entry::Occupied(mut entry) => entry.get_mut().push(lesson),
    Entry::Vacant(entry) => {
      entry.insert(Vec::from([lesson]));
    }
  }
}
