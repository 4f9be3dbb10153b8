use crate::lesson::LessonType;
use crate::query::DocumentMut;

pub const LEGEND_ID: &str = "schedule-reference";

/// Builds a detached colour key, one entry per lesson type, dropping an earlier one.
pub fn render_legend<D: DocumentMut>(doc: &mut D) -> D::Node {
  if let Some(previous) = doc.by_id(LEGEND_ID) {
    doc.remove(previous);
  }

  let legend = doc.create_element("div");
  doc.set_attr(legend, "id", LEGEND_ID);
  doc.set_style(legend, "margin-top", "15px");
  doc.set_style(legend, "display", "flex");
  doc.set_style(legend, "flex-direction", "column");
  doc.set_style(legend, "gap", "5px");

  for kind in LessonType::ALL {
    let entry = doc.create_element("div");
    doc.set_style(entry, "display", "flex");
    doc.set_style(entry, "flex-direction", "row");
    doc.set_style(entry, "align-items", "center");
    doc.set_style(entry, "gap", "5px");

    let swatch = doc.create_element("div");
    doc.set_style(swatch, "background-color", kind.color());
    doc.set_style(swatch, "width", "20px");
    doc.set_style(swatch, "height", "20px");

    let label = doc.create_text_element("p", kind.label());
    doc.set_style(label, "margin", "0");

    doc.append_child(entry, swatch);
    doc.append_child(entry, label);
    doc.append_child(legend, entry);
  }

  legend
}
