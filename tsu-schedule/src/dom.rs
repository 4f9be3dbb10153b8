use select::document::Document;
use select::node::Node as SourceNode;
use select::predicate::Name;

use crate::query::{DocumentMut, DocumentQuery, Observable};

const VOID_ELEMENTS: [&str; 14] = [
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
  "track", "wbr",
];
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
enum Data {
  Element {
    name: String,
    attrs: Vec<(String, String)>,
  },
  Text(String),
  Comment(String),
}

#[derive(Clone, Debug)]
struct Node {
  parent: Option<NodeId>,
  children: Vec<NodeId>,
  data: Data,
}

/// Owned, mutable HTML tree.
///
/// Markup is parsed through `select` (html5ever), so the tree has the same shape a
/// browser would build: implicit `html`/`head`/`body` and `tbody` elements included.
/// Removed nodes stay in the arena, detached, so handles never dangle.
#[derive(Clone, Debug, Default)]
pub struct Dom {
  nodes: Vec<Node>,
  roots: Vec<NodeId>,
  observing: bool,
  records: usize,
}

impl Dom {
  pub fn parse(html: &str) -> Self {
    let mut dom = Self::default();
    dom.roots = dom.import_document(html);
    dom
  }

  /// Replaces the whole document. Counts as one child-list mutation.
  ///
  /// Handles obtained before the call are invalidated.
  pub fn replace_document(&mut self, html: &str) {
    self.nodes.clear();
    self.roots = self.import_document(html);
    self.record();
  }

  /// Serializes the whole document.
  pub fn html(&self) -> String {
    let mut out = String::from("<!DOCTYPE html>");
    for root in &self.roots {
      self.write_node(*root, &mut out, false);
    }
    out
  }

  fn import_document(&mut self, html: &str) -> Vec<NodeId> {
    let document = Document::from(html);
    document
      .find(Name("html"))
      .take(1)
      .filter_map(|root| self.import(root, None))
      .collect()
  }

  fn import_fragment(&mut self, html: &str, parent: NodeId) -> Vec<NodeId> {
    let document = Document::from(html);
    let body = match document.find(Name("body")).next() {
      None => return Vec::new(),
      Some(body) => body,
    };

    body
      .children()
      .filter_map(|child| self.import(child, Some(parent)))
      .collect()
  }

  fn import(&mut self, source: SourceNode, parent: Option<NodeId>) -> Option<NodeId> {
    let data = if let Some(name) = source.name() {
      Data::Element {
        name: name.to_string(),
        attrs: source
          .attrs()
          .map(|(key, value)| (key.to_string(), value.to_string()))
          .collect(),
      }
    } else if let Some(text) = source.as_text() {
      Data::Text(text.to_string())
    } else if let Some(comment) = source.as_comment() {
      Data::Comment(comment.to_string())
    } else {
      return None;
    };

    let id = self.push(data, parent);
    for child in source.children() {
      if let Some(child) = self.import(child, Some(id)) {
        self.nodes[id.0].children.push(child);
      }
    }

    Some(id)
  }

  fn push(&mut self, data: Data, parent: Option<NodeId>) -> NodeId {
    self.nodes.push(Node {
      parent,
      children: Vec::new(),
      data,
    });
    NodeId(self.nodes.len() - 1)
  }

  fn name(&self, node: NodeId) -> Option<&str> {
    match &self.nodes[node.0].data {
      Data::Element { name, .. } => Some(name.as_str()),
      _ => None,
    }
  }

  fn is_connected(&self, mut node: NodeId) -> bool {
    loop {
      match self.nodes[node.0].parent {
        Some(parent) => node = parent,
        None => return self.roots.contains(&node),
      }
    }
  }

  fn record(&mut self) {
    if self.observing {
      self.records += 1;
    }
  }

  fn detach(&mut self, node: NodeId) {
    match self.nodes[node.0].parent.take() {
      Some(parent) => self.nodes[parent.0].children.retain(|child| *child != node),
      None => self.roots.retain(|root| *root != node),
    }
  }

  /// Pre-order walk over connected elements.
  fn find(&self, predicate: impl Fn(NodeId) -> bool) -> Option<NodeId> {
    let mut stack = self.roots.iter().rev().copied().collect::<Vec<_>>();
    while let Some(node) = stack.pop() {
      if self.name(node).is_some() && predicate(node) {
        return Some(node);
      }
      stack.extend(self.nodes[node.0].children.iter().rev());
    }
    None
  }

  fn write_node(&self, node: NodeId, out: &mut String, raw: bool) {
    match &self.nodes[node.0].data {
      Data::Text(text) if raw => out.push_str(text),
      Data::Text(text) => escape_text(text, out),
      Data::Comment(comment) => {
        out.push_str("<!--");
        out.push_str(comment);
        out.push_str("-->");
      }
      Data::Element { name, attrs } => {
        out.push('<');
        out.push_str(name);
        for (key, value) in attrs {
          out.push(' ');
          out.push_str(key);
          out.push_str("=\"");
          escape_attr(value, out);
          out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&name.as_str()) {
          return;
        }

        self.write_children(node, out);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
      }
    }
  }

  fn write_children(&self, node: NodeId, out: &mut String) {
    let raw = self
      .name(node)
      .map_or(false, |name| RAW_TEXT_ELEMENTS.contains(&name));
    for child in &self.nodes[node.0].children {
      self.write_node(*child, out, raw);
    }
  }

  fn write_text(&self, node: NodeId, out: &mut String) {
    match &self.nodes[node.0].data {
      Data::Text(text) => out.push_str(text),
      Data::Comment(_) => {}
      Data::Element { name, .. } if name == "br" => out.push(' '),
      Data::Element { .. } => {
        for child in &self.nodes[node.0].children {
          self.write_text(*child, out);
        }
      }
    }
  }
}

impl DocumentQuery for Dom {
  type Node = NodeId;

  fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
    self.find(|node| self.name(node) == Some(tag))
  }

  fn by_id(&self, id: &str) -> Option<NodeId> {
    self.find(|node| self.attr(node, "id") == Some(id))
  }

  fn parent(&self, node: NodeId) -> Option<NodeId> {
    self.nodes[node.0].parent
  }

  fn children(&self, node: NodeId) -> Vec<NodeId> {
    self.nodes[node.0]
      .children
      .iter()
      .copied()
      .filter(|child| self.name(*child).is_some())
      .collect()
  }

  fn tag_name(&self, node: NodeId) -> Option<&str> {
    self.name(node)
  }

  fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
    match &self.nodes[node.0].data {
      Data::Element { attrs, .. } => attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str()),
      _ => None,
    }
  }

  fn inner_html(&self, node: NodeId) -> String {
    let mut out = String::new();
    self.write_children(node, &mut out);
    out
  }

  fn inner_text(&self, node: NodeId) -> String {
    let mut out = String::new();
    self.write_text(node, &mut out);
    normalize_ws(&out)
  }
}

impl DocumentMut for Dom {
  fn create_element(&mut self, tag: &str) -> NodeId {
    self.push(
      Data::Element {
        name: tag.to_string(),
        attrs: Vec::new(),
      },
      None,
    )
  }

  fn create_text_element(&mut self, tag: &str, text: &str) -> NodeId {
    let element = self.create_element(tag);
    let text = self.push(Data::Text(text.to_string()), Some(element));
    self.nodes[element.0].children.push(text);
    element
  }

  fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
    if let Data::Element { attrs, .. } = &mut self.nodes[node.0].data {
      match attrs.iter_mut().find(|(key, _)| key == name) {
        Some((_, current)) => *current = value.to_string(),
        None => attrs.push((name.to_string(), value.to_string())),
      }
    }
  }

  fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
    let mut declarations = self
      .attr(node, "style")
      .unwrap_or_default()
      .split(';')
      .filter_map(|declaration| declaration.split_once(':'))
      .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
      .filter(|(key, _)| !key.is_empty())
      .collect::<Vec<_>>();

    match declarations.iter_mut().find(|(key, _)| key == property) {
      Some((_, current)) => *current = value.to_string(),
      None => declarations.push((property.to_string(), value.to_string())),
    }

    let style = declarations
      .iter()
      .map(|(key, value)| format!("{key}: {value};"))
      .collect::<Vec<_>>()
      .join(" ");
    self.set_attr(node, "style", &style);
  }

  fn set_inner_html(&mut self, node: NodeId, html: &str) {
    for child in std::mem::take(&mut self.nodes[node.0].children) {
      self.nodes[child.0].parent = None;
    }
    let children = self.import_fragment(html, node);
    self.nodes[node.0].children = children;

    if self.is_connected(node) {
      self.record();
    }
  }

  fn append_child(&mut self, parent: NodeId, child: NodeId) {
    let was_connected = self.is_connected(child);
    self.detach(child);
    self.nodes[child.0].parent = Some(parent);
    self.nodes[parent.0].children.push(child);

    if was_connected || self.is_connected(parent) {
      self.record();
    }
  }

  fn remove(&mut self, node: NodeId) {
    let was_connected = self.is_connected(node);
    self.detach(node);

    if was_connected {
      self.record();
    }
  }
}

impl Observable for Dom {
  fn observe(&mut self) {
    self.observing = true;
  }

  fn disconnect(&mut self) {
    self.observing = false;
    self.records = 0;
  }

  fn take_records(&mut self) -> usize {
    std::mem::take(&mut self.records)
  }
}

fn escape_text(value: &str, out: &mut String) {
  for ch in value.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '\u{a0}' => out.push_str("&nbsp;"),
      _ => out.push(ch),
    }
  }
}

fn escape_attr(value: &str, out: &mut String) {
  for ch in value.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '"' => out.push_str("&quot;"),
      '\u{a0}' => out.push_str("&nbsp;"),
      _ => out.push(ch),
    }
  }
}

/// Collapse sequences of whitespace into a single space and trim.
pub(crate) fn normalize_ws(value: &str) -> String {
  value.split_whitespace().collect::<Vec<_>>().join(" ")
}
