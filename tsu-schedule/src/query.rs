use std::fmt::Debug;

/// Read access to a document tree.
///
/// Only elements are ever handed out as nodes; text lives inside them and is reached
/// through [`DocumentQuery::inner_html`] and [`DocumentQuery::inner_text`].
pub trait DocumentQuery {
  type Node: Copy + Eq + Debug;

  /// First element with the given tag name in document order.
  fn first_by_tag(&self, tag: &str) -> Option<Self::Node>;

  fn by_id(&self, id: &str) -> Option<Self::Node>;

  fn parent(&self, node: Self::Node) -> Option<Self::Node>;

  /// Element children, text and comments skipped.
  fn children(&self, node: Self::Node) -> Vec<Self::Node>;

  fn tag_name(&self, node: Self::Node) -> Option<&str>;

  fn attr(&self, node: Self::Node, name: &str) -> Option<&str>;

  fn inner_html(&self, node: Self::Node) -> String;

  /// Text content with whitespace collapsed.
  fn inner_text(&self, node: Self::Node) -> String;

  fn child_by_tag(&self, node: Self::Node, tag: &str) -> Option<Self::Node> {
    self
      .children(node)
      .into_iter()
      .find(|child| self.tag_name(*child) == Some(tag))
  }

  fn children_by_tag(&self, node: Self::Node, tag: &str) -> Vec<Self::Node> {
    self
      .children(node)
      .into_iter()
      .filter(|child| self.tag_name(*child) == Some(tag))
      .collect()
  }
}

/// Write access to a document tree.
pub trait DocumentMut: DocumentQuery {
  /// Creates a detached element.
  fn create_element(&mut self, tag: &str) -> Self::Node;

  /// Creates a detached element holding a single text child.
  fn create_text_element(&mut self, tag: &str, text: &str) -> Self::Node;

  fn set_attr(&mut self, node: Self::Node, name: &str, value: &str);

  /// Sets one inline style property, replacing an earlier value of the same property.
  fn set_style(&mut self, node: Self::Node, property: &str, value: &str);

  fn set_inner_html(&mut self, node: Self::Node, html: &str);

  /// Moves `child` to the end of `parent`'s children.
  fn append_child(&mut self, parent: Self::Node, child: Self::Node);

  /// Detaches the node from the tree.
  fn remove(&mut self, node: Self::Node);
}

/// Child-list mutation notifications, modelled after a mutation observer.
pub trait Observable {
  fn observe(&mut self);

  /// Stops recording and discards pending records.
  fn disconnect(&mut self);

  /// Number of mutation records since the last call.
  fn take_records(&mut self) -> usize;
}
