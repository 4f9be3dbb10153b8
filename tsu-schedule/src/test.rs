use time::Weekday::{Monday, Saturday, Sunday, Tuesday, Wednesday};

use crate::grid::lesson_content;
use crate::legend::render_legend;
use crate::lesson::normalize_time;
use crate::parser::parse;
use crate::{
  render_pass, ChangeWatcher, DocumentMut, DocumentQuery, Dom, Grid, Grouping, Lesson,
  LessonType, NodeId, Observable, Variant, GRID_ID, LEGEND_ID,
};

const SCENARIO_PAGE: &str = concat!(
  "<html><body><div id=\"schedule\"><table>",
  "<thead><tr><th>ლექცია</th><th>პრაქტიკული</th></tr></thead>",
  "<tbody><tr><td>X</td>",
  "<td><div><div>Lector: A</div><div>Room: 101</div><div>ორშაბათი,09:00-10:30</div></div></td>",
  "<td></td></tr></tbody>",
  "</table></div></body></html>"
);

fn header_typed_cell(lecturer: &str, room: &str, when: &str) -> String {
  format!(
    "<td><div><div>ლექტორი: {lecturer}</div><div>აუდიტორია: {room}</div><div>დრო: {when}</div></div></td>"
  )
}

fn header_typed_page() -> String {
  let rows = [
    format!(
      "<tr><td>Math</td>{}<td></td></tr>",
      header_typed_cell("Beridze", "101", "ორშაბათი,9:00-10:30")
    ),
    format!(
      "<tr><td>Physics</td>{}{}</tr>",
      header_typed_cell("Kapanadze", "202", "კვირა,09:00-10:30"),
      header_typed_cell("Lomidze", "203", "სამშაბათი,12:00-13:00")
    ),
    "<tr><td>Chemistry</td><td><div><div>ლექტორი: X</div><div>აუდიტორია: 1</div></div></td><td>   </td></tr>"
      .to_string(),
    format!(
      "<tr><td>Biology</td>{}{}</tr>",
      header_typed_cell("Gelashvili", "301", "ორშაბათი,noon-13:00"),
      header_typed_cell("Tsereteli", "302", "ორშაბათი,08:00-09:00")
    ),
  ];

  format!(
    "<html><body><div><table><thead><tr><th>საგანი</th><th>ლექცია</th><th>სამუშაო ჯგუფი</th><th>უცნობი</th></tr></thead><tbody>{}</tbody></table></div></body></html>",
    rows.concat()
  )
}

const SYLLABUS_LINKED_PAGE: &str = concat!(
  "<html><body><section><table><tbody>",
  "<tr><td>Algorithms</td>",
  "<td>Lecturer: A<br>Day: ორშაბათი<br>Start: 09:00<br>End: 10:30<br>Room: 101</td>",
  "<td></td>",
  "<td>Lecturer: B<br>Day: ოთხშაბათი<br>Start: 14:00<br>End: 15:00</td>",
  "<td>Lecturer: C<br/>Day: შაბათი<br/>Start: 10:00<br/>End: 11:00<br/>Room: 5</td>",
  "<td id=\"syllabus_482\"><a>Syllabus</a></td></tr>",
  "<tr><td>Short</td></tr>",
  "</tbody></table></section></body></html>"
);

fn lesson(kind: LessonType, name: &str, start_time: &str, end_time: &str) -> Lesson {
  Lesson::new(kind, name, "Lecturer", "101", start_time, end_time, "").unwrap()
}

fn legacy_table(dom: &Dom) -> NodeId {
  dom.first_by_tag("table").unwrap()
}

#[test]
fn dom_serializes_and_reads_text() {
  let dom = Dom::parse("<div id=\"a\"><p>Hello <b>world</b> &amp; more</p><br></div>");
  let div = dom.by_id("a").unwrap();

  assert_eq!(
    dom.inner_html(div),
    "<p>Hello <b>world</b> &amp; more</p><br>"
  );
  assert_eq!(dom.inner_text(div), "Hello world & more");
  assert_eq!(dom.tag_name(dom.parent(div).unwrap()), Some("body"));
}

#[test]
fn dom_inserts_implicit_table_body() {
  let dom = Dom::parse("<table><tr><td>1</td></tr></table>");
  let table = legacy_table(&dom);

  assert!(dom.child_by_tag(table, "tbody").is_some());
}

#[test]
fn dom_set_style_replaces_property() {
  let mut dom = Dom::parse("<p id=\"p\" style=\"color: red\">x</p>");
  let p = dom.by_id("p").unwrap();

  dom.set_style(p, "display", "none");
  dom.set_style(p, "display", "none");

  assert_eq!(dom.attr(p, "style"), Some("color: red; display: none;"));
}

#[test]
fn dom_records_only_connected_child_list_changes() {
  let mut dom = Dom::parse("<div id=\"root\"></div>");
  let root = dom.by_id("root").unwrap();
  dom.observe();

  let detached = dom.create_element("span");
  let child = dom.create_text_element("b", "x");
  dom.append_child(detached, child);
  dom.set_inner_html(detached, "<i>y</i>");
  assert_eq!(dom.take_records(), 0);

  dom.append_child(root, detached);
  assert_eq!(dom.take_records(), 1);

  dom.set_attr(root, "class", "changed");
  assert_eq!(dom.take_records(), 0);

  dom.disconnect();
  dom.remove(detached);
  assert_eq!(dom.take_records(), 0);
  assert_eq!(dom.inner_html(root), "");
}

#[test]
fn normalizes_times() {
  assert_eq!(normalize_time("9:05"), Some("09:05".to_string()));
  assert_eq!(normalize_time(" 14:30 "), Some("14:30".to_string()));
  assert_eq!(normalize_time("24:00"), None);
  assert_eq!(normalize_time("9.05"), None);
}

#[test]
fn header_typed_scenario() {
  let dom = Dom::parse(SCENARIO_PAGE);
  let grouping = parse(&dom, legacy_table(&dom), Variant::HeaderTyped).unwrap();

  assert_eq!(
    grouping,
    Grouping::from([(
      Monday,
      vec![Lesson {
        kind: LessonType::Lecture,
        lecturer: "A".to_string(),
        name: "X".to_string(),
        start_time: "09:00".to_string(),
        end_time: "10:30".to_string(),
        room: "101".to_string(),
        syllabus_id: String::new(),
      }]
    )])
  );
}

#[test]
fn header_typed_skips_unusable_cells() {
  let dom = Dom::parse(&header_typed_page());
  let grouping = parse(&dom, legacy_table(&dom), Variant::HeaderTyped).unwrap();

  assert_eq!(grouping.len(), 2);
  assert!(!grouping.contains_key(&Sunday));

  let monday = &grouping[&Monday];
  assert_eq!(monday.len(), 2);
  assert_eq!(monday[0].name, "Math");
  assert_eq!(monday[0].kind, LessonType::Lecture);
  assert_eq!(monday[0].start_time, "09:00");
  assert_eq!(monday[1].name, "Biology");
  assert_eq!(monday[1].kind, LessonType::Group);
  assert_eq!(monday[1].lecturer, "Tsereteli");

  let tuesday = &grouping[&Tuesday];
  assert_eq!(tuesday.len(), 1);
  assert_eq!(tuesday[0].name, "Physics");
  assert_eq!(tuesday[0].room, "203");
}

#[test]
fn header_typed_without_header_is_rejected() {
  let dom = Dom::parse("<table><tbody><tr><td>X</td></tr></tbody></table>");

  assert_eq!(parse(&dom, legacy_table(&dom), Variant::HeaderTyped), None);
}

#[test]
fn syllabus_linked_decodes_escaped_text() {
  let dom = Dom::parse(concat!(
    "<table><tbody><tr><td>Algorithms</td>",
    "<td>Lecturer: A &lt;B&gt; &amp; C<br>Day: ორშაბათი<br>Start: 09:00<br>End: 10:30<br>Room: 1&nbsp;01</td>",
    "<td></td><td></td><td></td><td id=\"syllabus_7\"></td></tr></tbody></table>"
  ));
  let grouping = parse(&dom, legacy_table(&dom), Variant::SyllabusLinked).unwrap();

  let lesson = &grouping[&Monday][0];
  assert_eq!(lesson.lecturer, "A <B> & C");
  assert_eq!(lesson.room, "1 01");
}

#[test]
fn syllabus_linked_reads_fixed_columns() {
  let dom = Dom::parse(SYLLABUS_LINKED_PAGE);
  let grouping = parse(&dom, legacy_table(&dom), Variant::SyllabusLinked).unwrap();

  assert_eq!(grouping.len(), 1);
  assert!(!grouping.contains_key(&Wednesday));
  assert!(!grouping.contains_key(&Saturday));

  let monday = &grouping[&Monday];
  assert_eq!(
    monday,
    &vec![Lesson {
      kind: LessonType::Lecture,
      lecturer: "A".to_string(),
      name: "Algorithms".to_string(),
      start_time: "09:00".to_string(),
      end_time: "10:30".to_string(),
      room: "101".to_string(),
      syllabus_id: "482".to_string(),
    }]
  );
}

#[test]
fn grid_prunes_and_sorts() {
  let lesson_a = lesson(LessonType::Lecture, "A", "09:00", "10:00");
  let lesson_b = lesson(LessonType::Group, "B", "09:00", "10:00");
  let lesson_c = lesson(LessonType::Practicum, "C", "11:00", "12:00");
  let grouping = Grouping::from([
    (Monday, vec![lesson_a.clone()]),
    (Tuesday, vec![lesson_c.clone(), lesson_b.clone()]),
  ]);

  let grid = Grid::build(&grouping, Variant::HeaderTyped);

  assert_eq!(grid.columns, vec![Monday, Tuesday]);
  assert_eq!(grid.rows.len(), 2);
  assert_eq!(grid.cell(0, 0), Some(&lesson_a));
  assert_eq!(grid.cell(0, 1), Some(&lesson_b));
  assert_eq!(grid.cell(1, 1), Some(&lesson_c));
  assert_eq!(grid.cell(1, 0), None);
  assert_eq!(grid.lessons(), 3);
}

#[test]
fn grid_keeps_all_days_for_syllabus_linked() {
  let grouping = Grouping::from([(
    Tuesday,
    vec![lesson(LessonType::Lecture, "A", "09:00", "10:00")],
  )]);

  let grid = Grid::build(&grouping, Variant::SyllabusLinked);

  assert_eq!(grid.columns.len(), 5);
  assert_eq!(grid.rows.len(), 1);
  assert_eq!(grid.cell(0, 0), None);
  assert!(grid.cell(0, 1).is_some());
}

#[test]
fn grid_orders_columns_chronologically() {
  let grouping = Grouping::from([(
    Monday,
    vec![
      lesson(LessonType::Lecture, "late", "10:30", "11:30"),
      lesson(LessonType::Lecture, "unpadded", "9:05", "10:00"),
      lesson(LessonType::Lecture, "early", "08:00", "09:00"),
      lesson(LessonType::Lecture, "mid", "09:15", "10:15"),
    ],
  )]);

  let grid = Grid::build(&grouping, Variant::HeaderTyped);
  let names = grid
    .rows
    .iter()
    .filter_map(|row| row[0].as_ref())
    .map(|lesson| lesson.name.as_str())
    .collect::<Vec<_>>();

  assert_eq!(names, vec!["early", "unpadded", "mid", "late"]);
}

#[test]
fn empty_grouping_builds_empty_grid() {
  let grid = Grid::build(&Grouping::new(), Variant::HeaderTyped);

  assert!(grid.columns.is_empty());
  assert!(grid.rows.is_empty());
}

#[test]
fn lesson_content_escapes_and_links() {
  let mut lesson = Lesson::new(
    LessonType::Lecture,
    "A & B",
    "<Lecturer>",
    "101",
    "09:00",
    "10:30",
    "482",
  )
  .unwrap();

  let linked = lesson_content(&lesson, Variant::SyllabusLinked).unwrap();
  assert!(linked.contains("data-syllabus-id=\"482\""));
  assert!(linked.contains("A &amp; B"));
  assert!(linked.contains("&lt;Lecturer&gt;"));

  lesson.syllabus_id = String::new();
  let plain = lesson_content(&lesson, Variant::SyllabusLinked).unwrap();
  assert!(!plain.contains("<a"));
}

#[test]
fn legend_lists_types_in_order() {
  let mut dom = Dom::parse("<div id=\"root\"></div>");
  let legend = render_legend(&mut dom);

  let labels = dom
    .children(legend)
    .into_iter()
    .map(|entry| dom.inner_text(entry))
    .collect::<Vec<_>>();
  assert_eq!(labels, vec!["ლექცია", "ჯგუფური", "პრაქტიკული", "ლაბორატორია"]);

  let swatch = dom.children(dom.children(legend)[0])[0];
  assert_eq!(
    dom.attr(swatch, "style"),
    Some("background-color: LightSkyBlue; width: 20px; height: 20px;")
  );
}

#[test]
fn render_pass_inserts_grid_and_legend() {
  let mut dom = Dom::parse(SCENARIO_PAGE);

  let summary = render_pass(&mut dom, Variant::HeaderTyped).unwrap().unwrap();
  assert_eq!(summary.columns, 1);
  assert_eq!(summary.rows, 1);
  assert_eq!(summary.lessons, 1);

  let legacy = legacy_table(&dom);
  assert_eq!(dom.attr(legacy, "style"), Some("display: none;"));

  let grid = dom.by_id(GRID_ID).unwrap();
  let parent = dom.by_id("schedule").unwrap();
  assert_eq!(dom.parent(grid), Some(parent));
  assert_eq!(dom.inner_text(dom.child_by_tag(grid, "thead").unwrap()), "ორშაბათი");

  let body = dom.child_by_tag(grid, "tbody").unwrap();
  let row = dom.child_by_tag(body, "tr").unwrap();
  let cell = dom.child_by_tag(row, "td").unwrap();
  assert_eq!(dom.attr(cell, "data-color"), Some("LightSkyBlue"));
  assert_eq!(
    dom.inner_html(cell),
    "<strong>X</strong><br>A<br>09:00-10:30<br>101"
  );

  let children = dom.children(parent);
  assert_eq!(children.len(), 3);
  assert_eq!(dom.attr(children[2], "id"), Some(LEGEND_ID));
}

#[test]
fn render_pass_is_idempotent() {
  let mut dom = Dom::parse(&header_typed_page());

  render_pass(&mut dom, Variant::HeaderTyped).unwrap();
  let first = dom.html();
  render_pass(&mut dom, Variant::HeaderTyped).unwrap();
  let second = dom.html();

  assert_eq!(first, second);
  assert_eq!(second.matches("id=\"better-schedule\"").count(), 1);
  assert_eq!(second.matches("id=\"schedule-reference\"").count(), 1);
}

#[test]
fn render_pass_links_syllabus() {
  let mut dom = Dom::parse(SYLLABUS_LINKED_PAGE);

  let summary = render_pass(&mut dom, Variant::SyllabusLinked).unwrap().unwrap();
  assert_eq!(summary.columns, 5);
  assert_eq!(summary.lessons, 1);

  let html = dom.html();
  assert!(html.contains("<a href=\"#\" data-syllabus-id=\"482\">Algorithms</a>"));
}

#[test]
fn render_pass_without_table_leaves_page() {
  let mut dom = Dom::parse("<p>nothing to see</p>");
  let before = dom.html();

  assert_eq!(render_pass(&mut dom, Variant::HeaderTyped).unwrap(), None);
  assert_eq!(dom.html(), before);
}

#[test]
fn render_pass_leaves_layout_table_alone() {
  let mut dom = Dom::parse(concat!(
    "<div id=\"layout\"><table><tbody><tr><td>Menu</td><td>Content</td></tr></tbody></table></div>"
  ));
  let before = dom.html();

  assert_eq!(render_pass(&mut dom, Variant::HeaderTyped).unwrap(), None);
  assert_eq!(dom.html(), before);
  assert!(dom.by_id(GRID_ID).is_none());
  assert!(dom.by_id(LEGEND_ID).is_none());
}

#[test]
fn watcher_does_not_retrigger_itself() {
  let mut dom = Dom::default();
  let mut watcher = ChangeWatcher::new(Variant::HeaderTyped);
  watcher.start(&mut dom);
  assert!(watcher.is_running());
  assert_eq!(watcher.poll(&mut dom).unwrap(), None);

  dom.replace_document(SCENARIO_PAGE);
  let summary = watcher.poll(&mut dom).unwrap().unwrap();
  assert_eq!(summary.lessons, 1);
  assert!(dom.by_id(GRID_ID).is_some());

  assert_eq!(watcher.poll(&mut dom).unwrap(), None);

  watcher.stop(&mut dom);
  dom.replace_document(SCENARIO_PAGE);
  assert_eq!(watcher.poll(&mut dom).unwrap(), None);
  assert!(dom.by_id(GRID_ID).is_none());
}
